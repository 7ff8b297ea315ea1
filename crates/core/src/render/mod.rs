use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use ab_glyph::{FontArc, PxScale};
use image::{imageops::FilterType, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::{AbcDeckError, Result};

const LABEL_SIZE: f32 = 14.0;
const LABEL_BOTTOM_OFFSET: u32 = 5;
const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LABEL_COLOUR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Display-ready image for one key. Cloning shares the pixel buffer.
#[derive(Clone)]
pub struct KeyImage {
    inner: Arc<KeyImageInner>,
}

struct KeyImageInner {
    source: PathBuf,
    pixels: RgbaImage,
}

impl KeyImage {
    pub fn new(source: impl Into<PathBuf>, pixels: RgbaImage) -> Self {
        Self {
            inner: Arc::new(KeyImageInner {
                source: source.into(),
                pixels,
            }),
        }
    }

    /// Asset the image was rendered from.
    pub fn source(&self) -> &Path {
        &self.inner.source
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.inner.pixels
    }
}

impl fmt::Debug for KeyImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyImage")
            .field("source", &self.inner.source)
            .field("width", &self.inner.pixels.width())
            .field("height", &self.inner.pixels.height())
            .finish()
    }
}

/// Anything that can turn an icon asset into a [`KeyImage`].
pub trait RenderKey {
    fn render(&self, icon: &Path, label: &str) -> Result<KeyImage>;
}

/// Renders icon assets at the panel's per-key resolution.
#[derive(Clone)]
pub struct KeyRenderer {
    width: u32,
    height: u32,
    font: Option<FontArc>,
}

impl KeyRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            font: None,
        }
    }

    /// Loads the TrueType font used for key labels.
    pub fn with_font(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let font = FontArc::try_from_vec(bytes).map_err(|err| {
            AbcDeckError::msg(format!("invalid font `{}`: {err}", path.display()))
        })?;
        self.font = Some(font);
        Ok(self)
    }

    pub fn key_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Fits `icon` inside the key with no margin, keeping its aspect ratio,
    /// and centres it on a black background.
    fn fit(&self, icon: &Path) -> Result<RgbaImage> {
        let source = image::open(icon)?;
        let fitted = source
            .resize(self.width, self.height, FilterType::Triangle)
            .to_rgba8();

        let mut canvas = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        let x = (self.width - fitted.width()) / 2;
        let y = (self.height - fitted.height()) / 2;
        image::imageops::overlay(&mut canvas, &fitted, i64::from(x), i64::from(y));
        Ok(canvas)
    }

    fn draw_label(&self, canvas: &mut RgbaImage, label: &str) -> Result<()> {
        let font = self.font.as_ref().ok_or_else(|| {
            AbcDeckError::msg(format!("label `{label}` requested but no label font is loaded"))
        })?;
        let scale = PxScale::from(LABEL_SIZE);
        let (text_width, text_height) = text_size(scale, font, label);

        let x = (self.width as i32 - text_width as i32) / 2;
        let y = self.height as i32 - LABEL_BOTTOM_OFFSET as i32 - text_height as i32;
        draw_text_mut(canvas, LABEL_COLOUR, x, y, scale, font, label);
        Ok(())
    }
}

impl RenderKey for KeyRenderer {
    fn render(&self, icon: &Path, label: &str) -> Result<KeyImage> {
        let mut canvas = self.fit(icon)?;
        if !label.is_empty() {
            self.draw_label(&mut canvas, label)?;
        }
        tracing::trace!(path = %icon.display(), label, "rendered key image");
        Ok(KeyImage::new(icon, canvas))
    }
}

impl fmt::Debug for KeyRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRenderer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("has_font", &self.font.is_some())
            .finish()
    }
}
