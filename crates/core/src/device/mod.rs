use std::{
    sync::{Arc, Mutex, MutexGuard},
    thread::{self, JoinHandle},
};

use tracing::debug;

use crate::{AbcDeckError, KeyImage, Result, Scene};

#[cfg(feature = "streamdeck")]
mod streamdeck;

#[cfg(feature = "streamdeck")]
pub use streamdeck::StreamDeckPanel;

/// Highest brightness a panel accepts, in percent.
pub const MAX_BRIGHTNESS: u8 = 100;

/// A press or release of one key, as reported by the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub index: u8,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn press(index: u8) -> Self {
        Self {
            index,
            pressed: true,
        }
    }

    pub fn release(index: u8) -> Self {
        Self {
            index,
            pressed: false,
        }
    }
}

/// Raw access to one physical panel. Implementations are not expected to be
/// reentrant; [`DeviceGateway`] serialises every call.
pub trait Panel: Send + 'static {
    fn key_count(&self) -> usize;

    /// Per-key resolution in pixels.
    fn key_size(&self) -> (u32, u32);

    /// Clears every key image.
    fn reset(&mut self) -> Result<()>;

    fn set_brightness(&mut self, percent: u8) -> Result<()>;

    fn set_key_image(&mut self, index: u8, image: &KeyImage) -> Result<()>;

    /// Waits briefly for input. Returns the full button state when it
    /// changed, `None` when nothing happened, and an error once the device
    /// is gone.
    fn poll_buttons(&mut self) -> Result<Option<Vec<bool>>>;
}

/// Exclusive-access wrapper around a [`Panel`].
///
/// The lock is taken for a single call and released before returning, so
/// clones of the gateway can be used from the input thread and from startup
/// code alike.
pub struct DeviceGateway<P: Panel> {
    panel: Arc<Mutex<P>>,
    key_count: usize,
    key_size: (u32, u32),
}

impl<P: Panel> DeviceGateway<P> {
    pub fn new(panel: P) -> Self {
        let key_count = panel.key_count();
        let key_size = panel.key_size();
        Self {
            panel: Arc::new(Mutex::new(panel)),
            key_count,
            key_size,
        }
    }

    pub fn key_count(&self) -> usize {
        self.key_count
    }

    pub fn key_size(&self) -> (u32, u32) {
        self.key_size
    }

    /// Sets screen brightness, clamping to 100 percent.
    pub fn set_brightness(&self, percent: u8) -> Result<()> {
        let percent = percent.min(MAX_BRIGHTNESS);
        self.lock_panel()?.set_brightness(percent)
    }

    pub fn reset(&self) -> Result<()> {
        self.lock_panel()?.reset()
    }

    pub fn set_key_image(&self, index: u8, image: &KeyImage) -> Result<()> {
        debug!(key = index, path = %image.source().display(), "writing key image");
        self.lock_panel()?.set_key_image(index, image)
    }

    /// Clears the panel and shows every live key of `scene` released.
    pub fn render_scene(&self, scene: &Scene) -> Result<()> {
        self.reset()?;
        for (index, slot) in scene.active_keys() {
            let Ok(index) = u8::try_from(index) else {
                break;
            };
            self.set_key_image(index, &slot.inactive)?;
        }
        Ok(())
    }

    /// Starts the input thread. `callback` runs on that thread for every
    /// press and release, one at a time and in hardware order. The thread
    /// ends with the error that stopped polling, usually a disconnect.
    pub fn register_callback<F>(&self, mut callback: F) -> Result<JoinHandle<Result<()>>>
    where
        F: FnMut(KeyEvent) + Send + 'static,
    {
        let panel = Arc::clone(&self.panel);
        let mut buttons = vec![false; self.key_count];

        let handle = thread::Builder::new()
            .name("deck-input".to_string())
            .spawn(move || -> Result<()> {
                loop {
                    let snapshot = lock(&panel)?.poll_buttons()?;
                    let Some(snapshot) = snapshot else {
                        continue;
                    };
                    for event in diff_buttons(&mut buttons, &snapshot) {
                        callback(event);
                    }
                }
            })?;
        Ok(handle)
    }

    fn lock_panel(&self) -> Result<MutexGuard<'_, P>> {
        lock(&self.panel)
    }
}

impl<P: Panel> Clone for DeviceGateway<P> {
    fn clone(&self) -> Self {
        Self {
            panel: Arc::clone(&self.panel),
            key_count: self.key_count,
            key_size: self.key_size,
        }
    }
}

fn lock<P>(panel: &Mutex<P>) -> Result<MutexGuard<'_, P>> {
    panel
        .lock()
        .map_err(|_| AbcDeckError::msg("panel handle has been poisoned"))
}

/// Turns a full button snapshot into per-key events, lowest index first,
/// and remembers it as the new baseline.
fn diff_buttons(previous: &mut Vec<bool>, snapshot: &[bool]) -> Vec<KeyEvent> {
    if previous.len() < snapshot.len() {
        previous.resize(snapshot.len(), false);
    }

    let mut events = Vec::new();
    for (index, (&was, &now)) in previous.iter().zip(snapshot).enumerate() {
        if was == now {
            continue;
        }
        if let Ok(index) = u8::try_from(index) {
            events.push(KeyEvent {
                index,
                pressed: now,
            });
        }
    }

    previous[..snapshot.len()].copy_from_slice(snapshot);
    events
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::{
        testing::{image, new_log, take, MockPanel, Op},
        Category, KeySlot, SceneId, Voice,
    };

    fn pressed(indices: &[usize], len: usize) -> Vec<bool> {
        (0..len).map(|index| indices.contains(&index)).collect()
    }

    #[test]
    fn diff_emits_changes_in_index_order() {
        let mut previous = vec![false; 4];

        let events = diff_buttons(&mut previous, &pressed(&[3, 1], 4));
        assert_eq!(events, vec![KeyEvent::press(1), KeyEvent::press(3)]);

        let events = diff_buttons(&mut previous, &pressed(&[3], 4));
        assert_eq!(events, vec![KeyEvent::release(1)]);

        assert!(diff_buttons(&mut previous, &pressed(&[3], 4)).is_empty());
    }

    #[test]
    fn brightness_is_clamped() {
        let log = new_log();
        let gateway = DeviceGateway::new(MockPanel::new(log.clone(), 32));

        gateway.set_brightness(30).unwrap();
        gateway.set_brightness(250).unwrap();

        assert_eq!(take(&log), vec![Op::Brightness(30), Op::Brightness(100)]);
    }

    #[test]
    fn render_scene_resets_then_draws_live_keys() {
        let log = new_log();
        let gateway = DeviceGateway::new(MockPanel::new(log.clone(), 4));
        let scene = Scene::new(
            SceneId::new(Category::Alphabet, Voice::Primary),
            vec![
                Some(KeySlot::new(image("off/a.png"), image("on/a.png"))),
                None,
                Some(KeySlot::new(image("off/c.png"), image("on/c.png"))),
            ],
        );

        gateway.render_scene(&scene).unwrap();

        assert_eq!(
            take(&log),
            vec![
                Op::Reset,
                Op::Image(0, "off/a.png".into()),
                Op::Image(2, "off/c.png".into()),
            ]
        );
    }

    #[test]
    fn callback_receives_events_until_disconnect() {
        let log = new_log();
        let panel = MockPanel::new(log, 4).with_snapshots(vec![
            Some(pressed(&[0], 4)),
            None,
            Some(pressed(&[], 4)),
            Some(pressed(&[2, 3], 4)),
        ]);
        let gateway = DeviceGateway::new(panel);
        let (tx, rx) = mpsc::channel();

        let handle = gateway
            .register_callback(move |event| tx.send(event).unwrap())
            .unwrap();
        let outcome = handle.join().expect("input thread should not panic");

        assert!(matches!(outcome, Err(AbcDeckError::Device(_))));
        let events: Vec<KeyEvent> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                KeyEvent::press(0),
                KeyEvent::release(0),
                KeyEvent::press(2),
                KeyEvent::press(3),
            ]
        );
    }

    #[test]
    fn gateway_clones_share_the_panel() {
        let log = new_log();
        let gateway = DeviceGateway::new(MockPanel::new(log.clone(), 32));
        let clone = gateway.clone();

        gateway.reset().unwrap();
        clone.reset().unwrap();

        assert_eq!(take(&log), vec![Op::Reset, Op::Reset]);
        assert_eq!(clone.key_count(), 32);
        assert_eq!(clone.key_size(), (72, 72));
    }
}
