use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::chunk::ChunkLayout;

pub mod defaults {
    pub const INITIAL_RADIUS: i32 = 1;
    pub const LOADING_RADIUS: i32 = 1;
    pub const CHUNK_EDGE_LENGTH: i32 = crate::chunk::CHUNK_SIZE;
    pub const CHUNK_HEIGHT: i32 = 1;
}

/// Streaming radii and chunk dimensions.
///
/// Radii are Chebyshev distances in chunks, inclusive. `initial_radius` is
/// materialized once around the starting chunk; `loading_radius` is kept
/// active after every chunk crossing. The two are independent.
#[derive(Resource, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StreamingConfig {
    pub initial_radius: i32,
    pub loading_radius: i32,
    pub chunk_edge_length: i32,
    pub chunk_height: i32,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        use defaults::*;

        Self {
            initial_radius: INITIAL_RADIUS,
            loading_radius: LOADING_RADIUS,
            chunk_edge_length: CHUNK_EDGE_LENGTH,
            chunk_height: CHUNK_HEIGHT,
        }
    }
}

impl StreamingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_edge_length <= 0 {
            return Err(ConfigError::NonPositiveEdgeLength(self.chunk_edge_length));
        }
        if self.chunk_height <= 0 {
            return Err(ConfigError::NonPositiveHeight(self.chunk_height));
        }
        for (name, value) in [
            ("initial_radius", self.initial_radius),
            ("loading_radius", self.loading_radius),
        ] {
            if value < 0 {
                return Err(ConfigError::NegativeRadius { name, value });
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> ChunkLayout {
        ChunkLayout::new(self.chunk_edge_length, self.chunk_height)
    }

    /// Reads and validates a JSON config. Missing fields take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    NonPositiveEdgeLength(i32),
    NonPositiveHeight(i32),
    NegativeRadius { name: &'static str, value: i32 },
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveEdgeLength(value) => {
                write!(f, "chunk_edge_length must be positive, got {}", value)
            }
            ConfigError::NonPositiveHeight(value) => {
                write!(f, "chunk_height must be positive, got {}", value)
            }
            ConfigError::NegativeRadius { name, value } => {
                write!(f, "{} must not be negative, got {}", name, value)
            }
            ConfigError::Io(err) => write!(f, "failed to read streaming config: {}", err),
            ConfigError::Parse(err) => write!(f, "failed to parse streaming config: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = StreamingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.layout(), ChunkLayout::new(16, 1));
        assert_eq!(config.initial_radius, 1);
        assert_eq!(config.loading_radius, 1);
    }

    #[test]
    fn rejects_bad_dimensions_and_radii() {
        let bad_edge = StreamingConfig {
            chunk_edge_length: 0,
            ..Default::default()
        };
        assert!(matches!(
            bad_edge.validate(),
            Err(ConfigError::NonPositiveEdgeLength(0))
        ));

        let bad_height = StreamingConfig {
            chunk_height: -2,
            ..Default::default()
        };
        assert!(matches!(
            bad_height.validate(),
            Err(ConfigError::NonPositiveHeight(-2))
        ));

        let bad_radius = StreamingConfig {
            loading_radius: -1,
            ..Default::default()
        };
        assert!(matches!(
            bad_radius.validate(),
            Err(ConfigError::NegativeRadius {
                name: "loading_radius",
                value: -1
            })
        ));
    }

    #[test]
    fn zero_radii_are_allowed() {
        let config = StreamingConfig {
            initial_radius: 0,
            loading_radius: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = StreamingConfig::from_json(r#"{ "loading_radius": 3, "chunk_height": 4 }"#)
            .expect("parse config");
        assert_eq!(config.loading_radius, 3);
        assert_eq!(config.chunk_height, 4);
        assert_eq!(config.initial_radius, defaults::INITIAL_RADIUS);
        assert_eq!(config.chunk_edge_length, defaults::CHUNK_EDGE_LENGTH);
    }

    #[test]
    fn json_is_validated_and_parse_errors_surface() {
        assert!(matches!(
            StreamingConfig::from_json(r#"{ "initial_radius": -4 }"#),
            Err(ConfigError::NegativeRadius { .. })
        ));
        assert!(matches!(
            StreamingConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            StreamingConfig::load_from_file("definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
