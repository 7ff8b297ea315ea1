/// Result alias that carries the custom [`AbcDeckError`] type.
pub type Result<T> = std::result::Result<T, AbcDeckError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum AbcDeckError {
    /// Free-form failure, mostly construction-time mistakes such as a panel
    /// that is too small for the catalog layout.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// A key asset could not be opened or decoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    /// The configuration file is not valid JSON for [`crate::AppConfig`].
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// The panel rejected a command or went away.
    #[error("device error: {0}")]
    Device(String),
    /// A clip could not be decoded or the output device is unavailable.
    #[error("audio error: {0}")]
    Audio(String),
}

impl AbcDeckError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn device<T: Into<String>>(msg: T) -> Self {
        Self::Device(msg.into())
    }

    pub fn audio<T: Into<String>>(msg: T) -> Self {
        Self::Audio(msg.into())
    }
}

impl From<&str> for AbcDeckError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for AbcDeckError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
