use std::path::{Path, PathBuf};

use crate::export::manifest::ExportManifest;
use crate::foundation::error::{ScenecutError, ScenecutResult};

/// Receiver of the final composite description (the external renderer/encoder).
///
/// Errors returned by a sink are surfaced to the caller without interpretation.
pub trait ExportSink {
    /// Consume one manifest.
    fn export(&mut self, manifest: &ExportManifest) -> ScenecutResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryExportSink {
    manifests: Vec<ExportManifest>,
}

impl InMemoryExportSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Manifests received so far, oldest first.
    pub fn manifests(&self) -> &[ExportManifest] {
        &self.manifests
    }
}

impl ExportSink for InMemoryExportSink {
    fn export(&mut self, manifest: &ExportManifest) -> ScenecutResult<()> {
        self.manifests.push(manifest.clone());
        Ok(())
    }
}

/// Options for [`JsonFileSink`].
#[derive(Clone, Debug)]
pub struct JsonFileSinkOpts {
    /// Destination path.
    pub out_path: PathBuf,
    /// Replace an existing file.
    pub overwrite: bool,
}

/// Sink writing the manifest as pretty-printed JSON for an out-of-process renderer.
#[derive(Debug)]
pub struct JsonFileSink {
    opts: JsonFileSinkOpts,
}

impl JsonFileSink {
    /// Create a sink with `opts`.
    pub fn new(opts: JsonFileSinkOpts) -> Self {
        Self { opts }
    }
}

impl ExportSink for JsonFileSink {
    fn export(&mut self, manifest: &ExportManifest) -> ScenecutResult<()> {
        let path = &self.opts.out_path;
        if path.exists() && !self.opts.overwrite {
            return Err(ScenecutError::export(format!(
                "output '{}' exists and overwrite is disabled",
                path.display()
            )));
        }
        ensure_parent_dir(path)?;
        let json = serde_json::to_vec_pretty(manifest)?;
        std::fs::write(path, json)
            .map_err(|e| ScenecutError::export(format!("write '{}': {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "export manifest written");
        Ok(())
    }
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> ScenecutResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            ScenecutError::export(format!("create dir '{}': {e}", parent.display()))
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;
