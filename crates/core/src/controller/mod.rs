use tracing::{debug, error, info, trace, warn};

use crate::{
    device::MAX_BRIGHTNESS, AbcDeckError, ClipPlayer, DeviceGateway, KeyEvent, Panel, Result,
    SceneCatalog, SceneId,
};

const DEFAULT_BRIGHTNESS: u8 = 30;

/// Scene-driven key state machine.
///
/// The controller owns the catalog and the current scene id. Key images are
/// never cached here: what a key shows always follows from the current scene
/// and the last press or release of that key.
pub struct SceneController<P: Panel> {
    catalog: SceneCatalog,
    gateway: DeviceGateway<P>,
    player: Box<dyn ClipPlayer>,
    current: SceneId,
    brightness: u8,
}

impl<P: Panel> SceneController<P> {
    pub fn new(
        catalog: SceneCatalog,
        gateway: DeviceGateway<P>,
        player: Box<dyn ClipPlayer>,
        start: SceneId,
    ) -> Result<Self> {
        if !catalog.contains(start) {
            return Err(AbcDeckError::msg(format!(
                "start scene `{start}` is not in the catalog"
            )));
        }
        Ok(Self {
            catalog,
            gateway,
            player,
            current: start,
            brightness: DEFAULT_BRIGHTNESS,
        })
    }

    pub fn with_brightness(mut self, percent: u8) -> Self {
        self.brightness = percent.min(MAX_BRIGHTNESS);
        self
    }

    pub fn current_scene(&self) -> SceneId {
        self.current
    }

    pub fn catalog(&self) -> &SceneCatalog {
        &self.catalog
    }

    /// Applies brightness once and draws the start scene.
    pub fn start(&mut self) -> Result<()> {
        info!(scene = %self.current, brightness = self.brightness, "starting controller");
        self.gateway.set_brightness(self.brightness)?;
        self.redraw()
    }

    /// Handles one press or release.
    ///
    /// Gaps and indices past the scene are ignored. A press shows the active
    /// image, plays the slot's clip to completion and then follows its
    /// transition, if any. A release only restores the inactive image.
    pub fn handle(&mut self, event: KeyEvent) -> Result<()> {
        let Some(slot) = self.catalog.slot(self.current, usize::from(event.index)) else {
            trace!(
                scene = %self.current,
                key = event.index,
                pressed = event.pressed,
                "ignoring inert key"
            );
            return Ok(());
        };

        if !event.pressed {
            return self.gateway.set_key_image(event.index, &slot.inactive);
        }

        self.gateway.set_key_image(event.index, &slot.active)?;
        let target = slot.transition;

        if let Some(sound) = &slot.sound {
            debug!(scene = %self.current, key = event.index, path = %sound.display(), "playing");
            if let Err(err) = self.player.play_to_end(sound) {
                warn!(path = %sound.display(), %err, "clip playback failed");
            }
        }

        match target {
            Some(target) => self.enter(target),
            None => Ok(()),
        }
    }

    fn enter(&mut self, target: SceneId) -> Result<()> {
        if !self.catalog.contains(target) {
            error!(from = %self.current, to = %target, "transition to unknown scene");
            return Ok(());
        }
        info!(from = %self.current, to = %target, "switching scene");
        self.current = target;
        self.redraw()
    }

    /// Clears the panel and draws every live key of the current scene released.
    fn redraw(&self) -> Result<()> {
        match self.catalog.scene(self.current) {
            Some(scene) => self.gateway.render_scene(scene),
            None => Err(AbcDeckError::msg(format!(
                "scene `{}` is not in the catalog",
                self.current
            ))),
        }
    }
}
