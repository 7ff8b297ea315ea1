use std::path::{Path, PathBuf};

use crate::{config::VoiceConfig, AssetConfig, Category, Voice};

/// Brightness variant of an auxiliary overlay icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconShade {
    /// Shown while the key is released.
    Dim,
    /// Shown while the key is held.
    Bright,
}

impl IconShade {
    fn dir_name(self) -> &'static str {
        match self {
            IconShade::Dim => "dim",
            IconShade::Bright => "bright",
        }
    }
}

/// Path conventions for every asset the scene catalog pulls in.
///
/// ```text
/// {images}/{category}/{variant}/{glyph}.png
/// {images}/icons/{dim|bright}/{name}.png
/// {sounds}/{voice}/{category}/{glyph}.wav
/// {fonts}/{file}
/// ```
#[derive(Debug, Clone)]
pub struct AssetLayout {
    images_root: PathBuf,
    sounds_root: PathBuf,
    fonts_root: PathBuf,
    voices: VoiceConfig,
}

impl AssetLayout {
    pub fn new(assets: &AssetConfig, voices: &VoiceConfig) -> Self {
        Self {
            images_root: assets.images_root.clone(),
            sounds_root: assets.sounds_root.clone(),
            fonts_root: assets.fonts_root.clone(),
            voices: voices.clone(),
        }
    }

    pub fn glyph_image(&self, category: Category, variant: &str, glyph: &str) -> PathBuf {
        self.images_root
            .join(category.dir_name())
            .join(variant)
            .join(format!("{glyph}.png"))
    }

    pub fn icon_image(&self, shade: IconShade, name: &str) -> PathBuf {
        self.images_root
            .join("icons")
            .join(shade.dir_name())
            .join(format!("{name}.png"))
    }

    pub fn sound(&self, voice: Voice, category: Category, glyph: &str) -> PathBuf {
        self.sounds_root
            .join(self.voice_name(voice))
            .join(category.dir_name())
            .join(format!("{glyph}.wav"))
    }

    pub fn font(&self, file: impl AsRef<Path>) -> PathBuf {
        self.fonts_root.join(file)
    }

    /// Directory name of a narrator; doubles as the voice toggle's icon name.
    pub fn voice_name(&self, voice: Voice) -> &str {
        self.voices.name(voice)
    }
}

impl Default for AssetLayout {
    fn default() -> Self {
        Self::new(&AssetConfig::default(), &VoiceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_glyph_and_sound_paths() {
        let layout = AssetLayout::default();

        assert_eq!(
            layout.glyph_image(Category::Alphabet, "purple", "a"),
            PathBuf::from("images/abc/purple/a.png")
        );
        assert_eq!(
            layout.glyph_image(Category::Numerals, "yellow", "020"),
            PathBuf::from("images/123/yellow/020.png")
        );
        assert_eq!(
            layout.sound(Voice::Primary, Category::Alphabet, "q"),
            PathBuf::from("sounds/mama/abc/q.wav")
        );
        assert_eq!(
            layout.sound(Voice::Secondary, Category::Numerals, "100"),
            PathBuf::from("sounds/papa/123/100.wav")
        );
    }

    #[test]
    fn builds_icon_and_font_paths() {
        let assets = AssetConfig::rooted_at("/opt/deck");
        let layout = AssetLayout::new(&assets, &VoiceConfig::default());

        assert_eq!(
            layout.icon_image(IconShade::Bright, "papa"),
            PathBuf::from("/opt/deck/images/icons/bright/papa.png")
        );
        assert_eq!(
            layout.font("Roboto-Regular.ttf"),
            PathBuf::from("/opt/deck/fonts/Roboto-Regular.ttf")
        );
    }
}
