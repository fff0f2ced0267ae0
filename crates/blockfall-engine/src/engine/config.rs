use serde::{Deserialize, Serialize};

use crate::core::MIN_SHAPE_SIZE;

/// Error returned when a [`GameConfig`] value is out of range.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("{name} must be at least {min}, got {value}")]
    TooSmall {
        name: &'static str,
        min: usize,
        value: usize,
    },
    #[display("{name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[display("{name} must be a non-negative finite number, got {value}")]
    Negative { name: &'static str, value: f32 },
}

/// Tunable parameters of a game session.
///
/// Missing fields take their default values when deserialized, so a config file
/// only needs to list what it changes:
///
/// ```
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "field_width": 8 }"#).unwrap();
/// assert_eq!(config.field_width, 8);
/// assert_eq!(config.field_height, GameConfig::default().field_height);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of playable columns.
    pub field_width: usize,
    /// Number of visible playable rows.
    pub field_height: usize,
    /// Largest accepted shape size. Also the width of the wall margin.
    pub max_shape_size: usize,
    /// Initial fall speed in cells per second.
    pub normal_speed: f32,
    /// Fall speed after a drop, in cells per second.
    pub drop_speed: f32,
    /// Seconds to wait after a horizontal move before the next one.
    pub move_delay: f32,
    /// The pre-fall delay after a spawn is `spawn_delay_factor / normal_speed` seconds.
    pub spawn_delay_factor: f32,
    /// Cleared rows needed for a speedup.
    pub rows_to_speedup: usize,
    /// Increase of the normal fall speed on each speedup.
    pub speedup_amount: f32,
    /// Seconds a row collapse takes to settle when the presentation layer does not
    /// signal it. `None` waits for the signal.
    pub collapse_settle_time: Option<f32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 10,
            field_height: 13,
            max_shape_size: 5,
            normal_speed: 2.0,
            drop_speed: 8000.0,
            move_delay: 0.1,
            spawn_delay_factor: 2.0,
            rows_to_speedup: 10,
            speedup_amount: 0.5,
            collapse_settle_time: Some(0.2),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("field_width", self.field_width, 1)?;
        at_least("field_height", self.field_height, 1)?;
        at_least("max_shape_size", self.max_shape_size, MIN_SHAPE_SIZE)?;
        at_least("rows_to_speedup", self.rows_to_speedup, 1)?;
        positive("normal_speed", self.normal_speed)?;
        positive("drop_speed", self.drop_speed)?;
        non_negative("move_delay", self.move_delay)?;
        non_negative("spawn_delay_factor", self.spawn_delay_factor)?;
        non_negative("speedup_amount", self.speedup_amount)?;
        if let Some(settle) = self.collapse_settle_time {
            non_negative("collapse_settle_time", settle)?;
        }
        Ok(())
    }
}

fn at_least(name: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::TooSmall { name, min, value });
    }
    Ok(())
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::NotPositive { name, value });
    }
    Ok(())
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}
