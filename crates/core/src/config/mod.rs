use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{AssetLayout, Category, Result, SceneId, Voice};

/// Top-level configuration structure for the application.
///
/// Every section falls back to its defaults, so a configuration file only
/// needs to mention what it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub assets: AssetConfig,
    pub palette: PaletteConfig,
    pub voices: VoiceConfig,
    pub panel: PanelConfig,
    pub start: StartConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Scene shown when the controller starts.
    pub fn start_scene(&self) -> SceneId {
        SceneId::new(self.start.category, self.start.voice)
    }

    pub fn asset_layout(&self) -> AssetLayout {
        AssetLayout::new(&self.assets, &self.voices)
    }
}

/// Where the image, sound and font collaborators keep their files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub images_root: PathBuf,
    pub sounds_root: PathBuf,
    pub fonts_root: PathBuf,
    /// File name under `fonts_root` used for key labels.
    pub label_font: Option<String>,
}

impl AssetConfig {
    /// Points all three roots at the conventional sub-directories of `dir`.
    pub fn rooted_at(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            images_root: dir.join("images"),
            sounds_root: dir.join("sounds"),
            fonts_root: dir.join("fonts"),
            label_font: None,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            images_root: PathBuf::from("images"),
            sounds_root: PathBuf::from("sounds"),
            fonts_root: PathBuf::from("fonts"),
            label_font: None,
        }
    }
}

/// Colour variants used for glyph keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub inactive_variant: String,
    pub active_variant: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            inactive_variant: "purple".to_string(),
            active_variant: "yellow".to_string(),
        }
    }
}

/// Directory names of the two narrators under the sounds root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub primary: String,
    pub secondary: String,
}

impl VoiceConfig {
    pub fn name(&self, voice: Voice) -> &str {
        match voice {
            Voice::Primary => &self.primary,
            Voice::Secondary => &self.secondary,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            primary: "mama".to_string(),
            secondary: "papa".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Screen brightness in percent, applied once at startup.
    pub brightness: u8,
    /// How long one hardware read may wait before the device lock is released.
    pub poll_interval_ms: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            brightness: 30,
            poll_interval_ms: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StartConfig {
    pub category: Category,
    pub voice: Voice,
}

impl Default for StartConfig {
    fn default() -> Self {
        Self {
            category: Category::Alphabet,
            voice: Voice::Primary,
        }
    }
}
