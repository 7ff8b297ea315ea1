//! Core library for the ABC Deck learning toy.
//!
//! A grid-button panel shows one scene at a time: letters or numerals, voiced
//! by one of two narrators. The [`SceneCatalog`] pre-renders every scene once
//! at startup, and the [`SceneController`] turns serialized press/release
//! events into key images, clip playback and scene transitions, talking to
//! the hardware only through a [`DeviceGateway`].

pub mod assets;
pub mod audio;
pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod render;
pub mod scene;

#[cfg(test)]
pub(crate) mod testing;

pub use assets::{AssetLayout, IconShade};
#[cfg(feature = "playback")]
pub use audio::RodioPlayer;
pub use audio::{ClipPlayer, SilentPlayer};
pub use config::{AppConfig, AssetConfig, PaletteConfig, PanelConfig, StartConfig, VoiceConfig};
pub use controller::SceneController;
#[cfg(feature = "streamdeck")]
pub use device::StreamDeckPanel;
pub use device::{DeviceGateway, KeyEvent, Panel};
pub use error::{AbcDeckError, Result};
pub use render::{KeyImage, KeyRenderer, RenderKey};
pub use scene::{Category, KeySlot, Scene, SceneCatalog, SceneId, Voice};
