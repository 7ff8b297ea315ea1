use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    AbcDeckError, AssetLayout, Category, IconShade, KeyImage, KeySlot, PaletteConfig, RenderKey,
    Result, Scene, SceneId, Voice,
};

/// Trailing keys reserved for the category selector and the voice toggle.
const AUX_KEYS: usize = 2;

/// Immutable mapping from scene identifier to its pre-rendered key layout.
#[derive(Debug, Clone, Default)]
pub struct SceneCatalog {
    scenes: HashMap<SceneId, Scene>,
}

impl SceneCatalog {
    /// Builds every scene for a panel with `key_count` keys.
    ///
    /// Each distinct asset is rendered exactly once and shared between the
    /// scenes that show it; any render failure aborts the build.
    pub fn build<R: RenderKey>(
        renderer: &R,
        layout: &AssetLayout,
        palette: &PaletteConfig,
        key_count: usize,
    ) -> Result<Self> {
        let required = Category::ALL
            .iter()
            .map(|category| category.glyphs().len())
            .max()
            .unwrap_or_default()
            + AUX_KEYS;
        if key_count < required {
            return Err(AbcDeckError::msg(format!(
                "panel has {key_count} keys but the scene layout needs {required}"
            )));
        }

        let mut builder = Builder {
            images: ImageCache::new(renderer),
            layout,
            palette,
            key_count,
        };

        let mut scenes = HashMap::new();
        for category in Category::ALL {
            for voice in Voice::ALL {
                let scene = builder.scene(SceneId::new(category, voice))?;
                debug!(
                    scene = %scene.id(),
                    keys = scene.active_keys().count(),
                    "built scene"
                );
                scenes.insert(scene.id(), scene);
            }
        }

        info!(
            scenes = scenes.len(),
            images = builder.images.len(),
            "scene catalog ready"
        );
        Ok(Self { scenes })
    }

    /// Wraps hand-made scenes. Later scenes replace earlier ones with the same id.
    pub fn from_scenes(scenes: impl IntoIterator<Item = Scene>) -> Self {
        Self {
            scenes: scenes.into_iter().map(|scene| (scene.id(), scene)).collect(),
        }
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(&id)
    }

    pub fn slot(&self, id: SceneId, index: usize) -> Option<&KeySlot> {
        self.scene(id).and_then(|scene| scene.slot(index))
    }

    pub fn contains(&self, id: SceneId) -> bool {
        self.scenes.contains_key(&id)
    }

    pub fn scene_ids(&self) -> impl Iterator<Item = SceneId> + '_ {
        self.scenes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

struct Builder<'a, R> {
    images: ImageCache<'a, R>,
    layout: &'a AssetLayout,
    palette: &'a PaletteConfig,
    key_count: usize,
}

impl<R: RenderKey> Builder<'_, R> {
    fn scene(&mut self, id: SceneId) -> Result<Scene> {
        let mut slots: Vec<Option<KeySlot>> = vec![None; self.key_count];

        for (index, glyph) in id.category.glyphs().iter().enumerate() {
            slots[index] = Some(self.glyph(id, glyph)?);
        }

        let category_target = SceneId::new(id.category.other(), id.voice);
        slots[self.key_count - 2] = Some(
            self.icon(category_target.category.dir_name())?
                .with_transition(category_target),
        );

        let voice_target = SceneId::new(id.category, id.voice.other());
        let voice_icon = self.layout.voice_name(voice_target.voice).to_string();
        slots[self.key_count - 1] = Some(self.icon(&voice_icon)?.with_transition(voice_target));

        Ok(Scene::new(id, slots))
    }

    fn glyph(&mut self, id: SceneId, glyph: &str) -> Result<KeySlot> {
        let inactive = self.layout.glyph_image(id.category, &self.palette.inactive_variant, glyph);
        let active = self.layout.glyph_image(id.category, &self.palette.active_variant, glyph);

        Ok(KeySlot::new(self.images.get(&inactive)?, self.images.get(&active)?)
            .with_sound(self.layout.sound(id.voice, id.category, glyph)))
    }

    fn icon(&mut self, name: &str) -> Result<KeySlot> {
        let dim = self.layout.icon_image(IconShade::Dim, name);
        let bright = self.layout.icon_image(IconShade::Bright, name);

        Ok(KeySlot::new(self.images.get(&dim)?, self.images.get(&bright)?))
    }
}

/// Memoises renders so an asset shared by several scenes is drawn once.
struct ImageCache<'a, R> {
    renderer: &'a R,
    rendered: HashMap<PathBuf, KeyImage>,
}

impl<'a, R: RenderKey> ImageCache<'a, R> {
    fn new(renderer: &'a R) -> Self {
        Self {
            renderer,
            rendered: HashMap::new(),
        }
    }

    fn get(&mut self, path: &Path) -> Result<KeyImage> {
        if let Some(image) = self.rendered.get(path) {
            return Ok(image.clone());
        }
        let image = self.renderer.render(path, "")?;
        self.rendered.insert(path.to_path_buf(), image.clone());
        Ok(image)
    }

    fn len(&self) -> usize {
        self.rendered.len()
    }
}
