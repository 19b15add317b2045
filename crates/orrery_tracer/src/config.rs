//! Tracer configuration.

use serde::{Deserialize, Serialize};

use crate::environment::DEFAULT_ENVIRONMENT_INTENSITY;

/// Render configuration.
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    /// Maximum number of mirror/refraction bounces per primary ray
    pub max_depth: u32,
    /// Multiplier applied to environment samples
    pub environment_intensity: f32,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            environment_intensity: DEFAULT_ENVIRONMENT_INTENSITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracerConfig::default();
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.environment_intensity, 1.5);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: TracerConfig = serde_json::from_str(r#"{ "max_depth": 2 }"#).unwrap();
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.environment_intensity, DEFAULT_ENVIRONMENT_INTENSITY);

        let config: TracerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TracerConfig::default());
    }
}
