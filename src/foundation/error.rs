/// Convenience result type used across scenecut.
pub type ScenecutResult<T> = Result<T, ScenecutError>;

/// Top-level error taxonomy for the fallible boundaries of the core.
///
/// The steady-state editing API (seek, property writes, scene selection) never fails: range
/// violations are clamped and missing references are no-ops. Errors only surface when loading
/// data, wiring a scheduler, or handing a manifest to an export sink.
#[derive(thiserror::Error, Debug)]
pub enum ScenecutError {
    /// Invalid user-provided project, property key, or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A tick scheduler could not start or drive its timer.
    #[error("scheduling error: {0}")]
    Scheduling(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Failure reported by an export sink, passed through uninterpreted.
    #[error("export error: {0}")]
    Export(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScenecutError {
    /// Build a [`ScenecutError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScenecutError::Scheduling`] value.
    pub fn scheduling(msg: impl Into<String>) -> Self {
        Self::Scheduling(msg.into())
    }

    /// Build a [`ScenecutError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`ScenecutError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}

impl From<serde_json::Error> for ScenecutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
