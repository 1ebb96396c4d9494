//! Dock system configuration
//!
//! Stores tunables in `~/.config/dockyard/dock.yaml`. Every field has a
//! default, so a partial file is fine.

use serde::{Deserialize, Serialize};

use crate::location::{TieBreak, DEFAULT_CENTER_FRACTION};

/// Dock behaviour settings that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockConfig {
    /// Fraction of a region's width and height used by the merge-as-tab zone
    pub center_fraction: f32,
    /// Resolution for pointers exactly on a zone diagonal
    pub tie_break: TieBreak,
    /// Smallest share a split child may have
    pub min_ratio: f32,
    /// Largest share a split child may have
    pub max_ratio: f32,
    /// Ratio used when a caller does not pick one
    pub default_ratio: f32,
    /// Reject re-registration of a live id instead of replacing it
    pub strict_registration: bool,
    /// Dropping outside every target floats the dragged dock
    pub float_on_drop_outside: bool,
    /// Width of splitter bars in pixels
    pub splitter_width: f32,
    /// Size of a floating window when the source has no laid-out size
    pub default_floating_size: (f32, f32),
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            center_fraction: DEFAULT_CENTER_FRACTION,
            tie_break: TieBreak::PreferHorizontal,
            min_ratio: 0.05,
            max_ratio: 0.95,
            default_ratio: 0.5,
            strict_registration: false,
            float_on_drop_outside: false,
            splitter_width: 6.0,
            default_floating_size: (400.0, 300.0),
        }
    }
}

impl DockConfig {
    /// Load config from disk, or return defaults if not found or invalid
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        let config: Self = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    return Self::default();
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match config.validate() {
            Ok(()) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        crate::config_paths::ensure_config_dir()?;
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Check that the values describe a usable configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.center_fraction) {
            return Err(format!(
                "center_fraction {} must be within [0, 1]",
                self.center_fraction
            ));
        }
        if !(self.min_ratio > 0.0 && self.min_ratio < self.max_ratio && self.max_ratio < 1.0) {
            return Err(format!(
                "ratio bounds must satisfy 0 < min_ratio < max_ratio < 1 (got {}..{})",
                self.min_ratio, self.max_ratio
            ));
        }
        if !self.ratio_in_range(self.default_ratio) {
            return Err(format!(
                "default_ratio {} outside ({}, {})",
                self.default_ratio, self.min_ratio, self.max_ratio
            ));
        }
        if self.splitter_width < 0.0 {
            return Err("splitter_width must not be negative".to_string());
        }
        let (w, h) = self.default_floating_size;
        if !(w > 0.0 && h > 0.0) {
            return Err("default_floating_size must be positive".to_string());
        }
        Ok(())
    }

    /// Whether a split ratio lies strictly between the configured bounds
    pub fn ratio_in_range(&self, ratio: f32) -> bool {
        ratio > self.min_ratio && ratio < self.max_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DockConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.center_fraction, 0.4);
        assert_eq!(config.min_ratio, 0.05);
        assert_eq!(config.max_ratio, 0.95);
        assert!(!config.strict_registration);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: DockConfig =
            serde_yaml::from_str("strict_registration: true\ntie_break: prefer-vertical\n")
                .unwrap();
        assert!(config.strict_registration);
        assert_eq!(config.tie_break, TieBreak::PreferVertical);
        assert_eq!(config.min_ratio, 0.05);
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let config = DockConfig {
            min_ratio: 0.6,
            max_ratio: 0.4,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_default_ratio_out_of_bounds() {
        let config = DockConfig {
            default_ratio: 0.99,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ratio_in_range_is_strict() {
        let config = DockConfig::default();
        assert!(config.ratio_in_range(0.5));
        assert!(!config.ratio_in_range(0.05));
        assert!(!config.ratio_in_range(0.95));
        assert!(!config.ratio_in_range(1.2));
    }
}
