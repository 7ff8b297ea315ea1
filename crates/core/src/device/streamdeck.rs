use std::time::Duration;

use elgato_streamdeck::{info::Kind, list_devices, new_hidapi, StreamDeck, StreamDeckInput};
use image::DynamicImage;
use tracing::info;

use crate::{AbcDeckError, KeyImage, Panel, Result};

/// [`Panel`] backed by an Elgato Stream Deck over HID.
pub struct StreamDeckPanel {
    deck: StreamDeck,
    kind: Kind,
    serial: String,
    poll_interval: Duration,
}

impl StreamDeckPanel {
    /// Model and serial number of every connected panel.
    pub fn list() -> Result<Vec<(String, String)>> {
        let hid = new_hidapi().map_err(|err| device_error("failed to initialise hidapi", err))?;
        Ok(list_devices(&hid)
            .into_iter()
            .map(|(kind, serial)| (format!("{kind:?}"), serial))
            .collect())
    }

    /// Opens the first connected panel. Only one panel is driven at a time.
    pub fn open_first(poll_interval: Duration) -> Result<Self> {
        let hid = new_hidapi().map_err(|err| device_error("failed to initialise hidapi", err))?;
        let (kind, serial) = list_devices(&hid)
            .into_iter()
            .next()
            .ok_or_else(|| AbcDeckError::device("no Stream Deck found"))?;

        let deck = StreamDeck::connect(&hid, kind, &serial)
            .map_err(|err| device_error("failed to connect", err))?;
        info!(model = ?kind, serial = %serial, keys = kind.key_count(), "opened panel");

        Ok(Self {
            deck,
            kind,
            serial,
            poll_interval,
        })
    }

    pub fn description(&self) -> String {
        format!("{:?} ({})", self.kind, self.serial)
    }
}

impl Panel for StreamDeckPanel {
    fn key_count(&self) -> usize {
        usize::from(self.kind.key_count())
    }

    fn key_size(&self) -> (u32, u32) {
        let (width, height) = self.kind.key_image_format().size;
        (width as u32, height as u32)
    }

    fn reset(&mut self) -> Result<()> {
        self.deck
            .reset()
            .map_err(|err| device_error("reset failed", err))
    }

    fn set_brightness(&mut self, percent: u8) -> Result<()> {
        self.deck
            .set_brightness(percent)
            .map_err(|err| device_error("brightness change failed", err))
    }

    fn set_key_image(&mut self, index: u8, image: &KeyImage) -> Result<()> {
        let frame = DynamicImage::ImageRgba8(image.pixels().clone());
        self.deck
            .set_button_image(index, frame)
            .map_err(|err| device_error("key write failed", err))?;
        self.deck
            .flush()
            .map_err(|err| device_error("flush failed", err))
    }

    fn poll_buttons(&mut self) -> Result<Option<Vec<bool>>> {
        match self.deck.read_input(Some(self.poll_interval)) {
            Ok(StreamDeckInput::ButtonStateChange(states)) => Ok(Some(states)),
            Ok(_) => Ok(None),
            Err(err) => Err(device_error("input read failed", err)),
        }
    }
}

fn device_error(context: &str, err: impl std::fmt::Display) -> AbcDeckError {
    AbcDeckError::device(format!("{context}: {err}"))
}
