//! Test doubles shared by the unit tests.

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use image::RgbaImage;

use crate::{
    AbcDeckError, AssetLayout, ClipPlayer, KeyImage, Panel, PaletteConfig, RenderKey, Result,
    SceneCatalog,
};

/// Everything the doubles observed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Reset,
    Brightness(u8),
    Image(u8, PathBuf),
    PlayStarted(PathBuf),
    PlayFinished(PathBuf),
}

pub type OpLog = Arc<Mutex<Vec<Op>>>;

pub fn new_log() -> OpLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn take(log: &OpLog) -> Vec<Op> {
    std::mem::take(&mut *log.lock().unwrap())
}

pub struct MockPanel {
    log: OpLog,
    key_count: usize,
    snapshots: VecDeque<Vec<bool>>,
}

impl MockPanel {
    pub fn new(log: OpLog, key_count: usize) -> Self {
        Self {
            log,
            key_count,
            snapshots: VecDeque::new(),
        }
    }

    /// Button snapshots handed out by `poll_buttons`; `None` means no change.
    /// Once exhausted the panel reports a disconnect.
    pub fn with_snapshots(mut self, snapshots: Vec<Option<Vec<bool>>>) -> Self {
        for snapshot in snapshots {
            self.snapshots.push_back(snapshot.unwrap_or_default());
        }
        self
    }

    fn record(&self, op: Op) {
        self.log.lock().unwrap().push(op);
    }
}

impl Panel for MockPanel {
    fn key_count(&self) -> usize {
        self.key_count
    }

    fn key_size(&self) -> (u32, u32) {
        (72, 72)
    }

    fn reset(&mut self) -> Result<()> {
        self.record(Op::Reset);
        Ok(())
    }

    fn set_brightness(&mut self, percent: u8) -> Result<()> {
        self.record(Op::Brightness(percent));
        Ok(())
    }

    fn set_key_image(&mut self, index: u8, image: &KeyImage) -> Result<()> {
        self.record(Op::Image(index, image.source().to_path_buf()));
        Ok(())
    }

    fn poll_buttons(&mut self) -> Result<Option<Vec<bool>>> {
        match self.snapshots.pop_front() {
            Some(snapshot) if snapshot.is_empty() => Ok(None),
            Some(snapshot) => Ok(Some(snapshot)),
            None => Err(AbcDeckError::device("mock panel unplugged")),
        }
    }
}

pub struct RecordingPlayer {
    log: OpLog,
    fail: bool,
}

impl RecordingPlayer {
    pub fn new(log: OpLog) -> Self {
        Self { log, fail: false }
    }

    pub fn failing(log: OpLog) -> Self {
        Self { log, fail: true }
    }
}

impl ClipPlayer for RecordingPlayer {
    fn play_to_end(&mut self, clip: &Path) -> Result<()> {
        if self.fail {
            return Err(AbcDeckError::audio("no output device"));
        }
        let mut log = self.log.lock().unwrap();
        log.push(Op::PlayStarted(clip.to_path_buf()));
        log.push(Op::PlayFinished(clip.to_path_buf()));
        Ok(())
    }
}

/// Renders 1x1 images tagged with the requested path and counts calls.
#[derive(Default)]
pub struct FakeRenderer {
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeRenderer {
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl RenderKey for FakeRenderer {
    fn render(&self, icon: &Path, _label: &str) -> Result<KeyImage> {
        self.calls.lock().unwrap().push(icon.to_path_buf());
        Ok(KeyImage::new(icon, RgbaImage::new(1, 1)))
    }
}

pub fn image(path: &str) -> KeyImage {
    KeyImage::new(path, RgbaImage::new(1, 1))
}

/// The built-in catalog for a 32-key panel with default asset paths.
pub fn default_catalog() -> SceneCatalog {
    SceneCatalog::build(
        &FakeRenderer::default(),
        &AssetLayout::default(),
        &PaletteConfig::default(),
        32,
    )
    .expect("default catalog should build")
}
