//! # Interpolation Configuration
//!
//! Tuning knobs for the interpolants, loaded once at startup from TOML.
//!
//! ```toml
//! [position]
//! time_delay_ms = 100.0
//! num_frames = 3
//!
//! [rotation]
//! time_delay_ms = 100.0
//! num_frames = 3
//!
//! [flags]
//! time_delay_ms = 100.0
//! num_frames = 4
//!
//! [actions]
//! crouch_time_ms = 200.0
//! jump_time_ms = 400.0
//! ```
//!
//! Every section and field is optional; missing values take the defaults below.
//!
//! The interpolants have no fixed time unit. Times here are milliseconds by
//! convention, which holds as long as the caller passes `time_diff` in
//! milliseconds too.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InterpolationError, InterpolationResult};

/// Default read delay behind the newest snapshot, in milliseconds.
pub const DEFAULT_TIME_DELAY_MS: f64 = 100.0;

/// Default ring buffer depth.
pub const DEFAULT_NUM_FRAMES: usize = 3;

/// Default time for a crouch blend to go from 0 to fully crouched, in milliseconds.
pub const DEFAULT_CROUCH_TIME_MS: f64 = 200.0;

/// Default cap for the jump charge, in milliseconds.
pub const DEFAULT_JUMP_TIME_MS: f64 = 400.0;

/// Ring-buffer parameters for one snapshot interpolant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Visual lag budget, in the caller's `time_diff` unit (milliseconds by
    /// convention). Larger values tolerate more jitter.
    pub time_delay_ms: f64,
    /// Ring depth. Larger values tolerate longer bursts.
    pub num_frames: usize,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            time_delay_ms: DEFAULT_TIME_DELAY_MS,
            num_frames: DEFAULT_NUM_FRAMES,
        }
    }
}

impl InterpolationConfig {
    /// Checks the construction contract of a snapshot interpolant.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::InsufficientFrames`] or
    /// [`InterpolationError::InvalidTimeDelay`].
    pub fn validate(&self) -> InterpolationResult<()> {
        if self.num_frames < 2 {
            return Err(InterpolationError::InsufficientFrames(self.num_frames));
        }
        if !self.time_delay_ms.is_finite() || self.time_delay_ms < 0.0 {
            return Err(InterpolationError::InvalidTimeDelay(self.time_delay_ms));
        }
        Ok(())
    }
}

/// Bounds for the avatar's action interpolants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Upper bound of the bidirectional crouch blend, in the `time_diff` unit.
    pub crouch_time_ms: f64,
    /// Upper bound of the unidirectional jump charge, in the `time_diff` unit.
    pub jump_time_ms: f64,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            crouch_time_ms: DEFAULT_CROUCH_TIME_MS,
            jump_time_ms: DEFAULT_JUMP_TIME_MS,
        }
    }
}

impl ActionConfig {
    /// Both bounds are used as `max` with a `min` of zero.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::InvalidBounds`] for a negative or NaN bound.
    pub fn validate(&self) -> InterpolationResult<()> {
        for max in [self.crouch_time_ms, self.jump_time_ms] {
            if max.is_nan() || max < 0.0 {
                return Err(InterpolationError::InvalidBounds { min: 0.0, max });
            }
        }
        Ok(())
    }
}

/// Full configuration of a [`RemoteAvatar`](crate::avatar::RemoteAvatar).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Position interpolant.
    pub position: InterpolationConfig,
    /// Rotation interpolant.
    pub rotation: InterpolationConfig,
    /// Boolean state flags.
    pub flags: InterpolationConfig,
    /// Action interpolant bounds.
    pub actions: ActionConfig,
}

impl AvatarConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::InvalidConfig`] if the document does not
    /// parse or any section violates its contract.
    pub fn from_toml_str(source: &str) -> InterpolationResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| InterpolationError::InvalidConfig(e.to_string()))?;
        config
            .validate()
            .map_err(|e| InterpolationError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::InvalidConfig`] if the file cannot be read
    /// or fails [`AvatarConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> InterpolationResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            InterpolationError::InvalidConfig(format!("{}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first contract violation found.
    pub fn validate(&self) -> InterpolationResult<()> {
        self.position.validate()?;
        self.rotation.validate()?;
        self.flags.validate()?;
        self.actions.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AvatarConfig::default();
        assert_eq!(config.position.time_delay_ms, 100.0);
        assert_eq!(config.position.num_frames, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AvatarConfig::from_toml_str(
            r#"
            [position]
            num_frames = 5

            [actions]
            jump_time_ms = 250.0
            "#,
        )
        .unwrap();

        assert_eq!(config.position.num_frames, 5);
        assert_eq!(config.position.time_delay_ms, DEFAULT_TIME_DELAY_MS);
        assert_eq!(config.rotation, InterpolationConfig::default());
        assert_eq!(config.actions.jump_time_ms, 250.0);
        assert_eq!(config.actions.crouch_time_ms, DEFAULT_CROUCH_TIME_MS);
    }

    #[test]
    fn test_rejects_single_frame() {
        let err = AvatarConfig::from_toml_str("[flags]\nnum_frames = 1\n").unwrap_err();
        assert!(matches!(err, InterpolationError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_negative_delay() {
        let config = InterpolationConfig {
            time_delay_ms: -5.0,
            num_frames: 3,
        };
        assert_eq!(
            config.validate(),
            Err(InterpolationError::InvalidTimeDelay(-5.0))
        );
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = AvatarConfig::from_toml_str("[position\n").unwrap_err();
        assert!(matches!(err, InterpolationError::InvalidConfig(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = AvatarConfig::from_toml_file("/nonexistent/wraith.toml").unwrap_err();
        assert!(matches!(err, InterpolationError::InvalidConfig(_)));
    }
}
