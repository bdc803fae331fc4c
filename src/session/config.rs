use std::path::Path;
use std::time::Duration;

use crate::foundation::core::Size;
use crate::foundation::error::{ScenecutError, ScenecutResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Tunables of an editing session. Every field has a default, so `{}` is a valid config.
pub struct SessionConfig {
    /// Wall-clock period of the tick loop in milliseconds.
    pub tick_interval_ms: u64,
    /// Timeline seconds advanced per tick; defaults to the interval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_dt_sec: Option<f64>,
    /// Frame box width used for crop rectangles.
    pub frame_width: f64,
    /// Frame box height used for crop rectangles.
    pub frame_height: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            tick_dt_sec: None,
            frame_width: 1920.0,
            frame_height: 1080.0,
        }
    }
}

impl SessionConfig {
    /// Validate ranges.
    pub fn validate(&self) -> ScenecutResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(ScenecutError::validation("tickIntervalMs must be > 0"));
        }
        if let Some(dt) = self.tick_dt_sec
            && (!dt.is_finite() || dt <= 0.0)
        {
            return Err(ScenecutError::validation(
                "tickDtSec must be finite and > 0 when set",
            ));
        }
        for (name, v) in [
            ("frameWidth", self.frame_width),
            ("frameHeight", self.frame_height),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(ScenecutError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }

    /// Tick period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Seconds advanced per tick.
    pub fn tick_dt(&self) -> f64 {
        self.tick_dt_sec
            .unwrap_or_else(|| self.tick_interval().as_secs_f64())
    }

    /// Frame box for crop rectangles.
    pub fn frame_size(&self) -> Size {
        Size::new(self.frame_width, self.frame_height)
    }

    /// Parse and validate a config from JSON text.
    pub fn from_json_str(s: &str) -> ScenecutResult<Self> {
        let cfg: SessionConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a config file.
    pub fn from_path(path: impl AsRef<Path>) -> ScenecutResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScenecutError::Other(
                anyhow::Error::new(e).context(format!("read config '{}'", path.display())),
            )
        })?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
