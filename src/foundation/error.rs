/// Convenience result type used across passview.
pub type PassResult<T> = Result<T, PassError>;

/// Top-level error taxonomy used by decoder, model and renderer APIs.
#[derive(thiserror::Error, Debug)]
pub enum PassError {
    /// The container could not be opened or its manifest is unusable.
    #[error("archive corrupt: {0}")]
    ArchiveCorrupt(String),

    /// `pass.json` is missing, malformed, or structurally wrong.
    #[error("descriptor invalid: {0}")]
    DescriptorInvalid(String),

    /// A mandatory descriptor field is absent.
    #[error("missing field: {0}")]
    FieldMissing(String),

    /// A style's layout precondition is not met.
    #[error("layout error: {0}")]
    Layout(String),

    /// Invalid render configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PassError {
    /// Build a [`PassError::ArchiveCorrupt`] value.
    pub fn archive_corrupt(msg: impl Into<String>) -> Self {
        Self::ArchiveCorrupt(msg.into())
    }

    /// Build a [`PassError::DescriptorInvalid`] value.
    pub fn descriptor_invalid(msg: impl Into<String>) -> Self {
        Self::DescriptorInvalid(msg.into())
    }

    /// Build a [`PassError::FieldMissing`] value.
    pub fn field_missing(name: impl Into<String>) -> Self {
        Self::FieldMissing(name.into())
    }

    /// Build a [`PassError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`PassError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
