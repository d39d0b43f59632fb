/// Convenience result type used across postframe.
pub type ComposeResult<T> = Result<T, ComposeError>;

/// Top-level error taxonomy used by compositor and session APIs.
///
/// Variants are kept apart by recovery path: a bad base image needs a reload, a bad export needs a
/// re-export, a bad logo is dropped and rendering continues.
#[derive(thiserror::Error, Debug)]
pub enum ComposeError {
    /// The base image could not be decoded or is unusable.
    #[error("base image error: {0}")]
    BaseImage(String),

    /// The logo image could not be decoded.
    #[error("logo error: {0}")]
    Logo(String),

    /// Encoding the rendered buffer failed.
    #[error("export error: {0}")]
    Export(String),

    /// A render was requested while no usable base image is available.
    #[error("cannot render: {0}")]
    NotReady(String),

    /// Invalid user-provided parameter data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Font database or shaping problems.
    #[error("font error: {0}")]
    Font(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ComposeError {
    /// Build a [`ComposeError::BaseImage`] value.
    pub fn base_image(msg: impl Into<String>) -> Self {
        Self::BaseImage(msg.into())
    }

    /// Build a [`ComposeError::Logo`] value.
    pub fn logo(msg: impl Into<String>) -> Self {
        Self::Logo(msg.into())
    }

    /// Build a [`ComposeError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`ComposeError::NotReady`] value.
    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady(msg.into())
    }

    /// Build a [`ComposeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ComposeError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
