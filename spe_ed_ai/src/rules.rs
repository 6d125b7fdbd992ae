use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_MAX_SPEED: u32 = 10;
pub const DEFAULT_HOLE_SPEED: u32 = 3;
pub const DEFAULT_HOLES_EACH_STEP: u32 = 6;

/// Errors raised when a ruleset cannot be used for simulation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("max_speed must be at least 1")]
    ZeroMaxSpeed,
    #[error("hole_speed must be at least 1")]
    ZeroHoleSpeed,
    #[error("holes_each_step must be at least 1")]
    ZeroHolesEachStep,
    #[error("{name}='{value}' is not an unsigned integer")]
    InvalidVariable { name: &'static str, value: String },
}

/// Game constants that shape movement and trail holes.
///
/// These are handed to the search and the crash predictor explicitly so a
/// strategy can be exercised against any parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rules {
    /// Upper bound on a player's speed.
    pub max_speed: u32,
    /// Minimum speed at which a hole tick leaves gaps in the trail.
    pub hole_speed: u32,
    /// Every n-th tick of a player is a hole tick.
    pub holes_each_step: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            max_speed: DEFAULT_MAX_SPEED,
            hole_speed: DEFAULT_HOLE_SPEED,
            holes_each_step: DEFAULT_HOLES_EACH_STEP,
        }
    }
}

impl Rules {
    pub fn new(
        max_speed: u32,
        hole_speed: u32,
        holes_each_step: u32,
    ) -> Result<Self, RulesError> {
        let rules = Rules {
            max_speed,
            hole_speed,
            holes_each_step,
        };
        rules.validate()?;
        Ok(rules)
    }

    /// Reads `MAX_SPEED`, `HOLE_SPEED` and `HOLES_EACH_STEP`. Missing
    /// variables keep the spe_ed defaults; a value that is set but not a
    /// usable number is an error.
    pub fn from_env() -> Result<Self, RulesError> {
        Rules::from_vars(|name| env::var(name).ok())
    }

    /// Like [`Rules::from_env`], reading variables through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self, RulesError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str, default: u32| match lookup(name) {
            None => Ok(default),
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|_| RulesError::InvalidVariable { name, value }),
        };

        Rules::new(
            read("MAX_SPEED", DEFAULT_MAX_SPEED)?,
            read("HOLE_SPEED", DEFAULT_HOLE_SPEED)?,
            read("HOLES_EACH_STEP", DEFAULT_HOLES_EACH_STEP)?,
        )
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.max_speed == 0 {
            return Err(RulesError::ZeroMaxSpeed);
        }
        if self.hole_speed == 0 {
            return Err(RulesError::ZeroHoleSpeed);
        }
        if self.holes_each_step == 0 {
            return Err(RulesError::ZeroHolesEachStep);
        }
        Ok(())
    }

    /// Whether a player moving at `speed` on its tick `step_counter + 1`
    /// leaves holes in its trail.
    #[inline(always)]
    pub fn is_hole_tick(&self, speed: u32, step_counter: u32) -> bool {
        self.holes_each_step != 0
            && speed >= self.hole_speed
            && (u64::from(step_counter) + 1) % u64::from(self.holes_each_step) == 0
    }
}

/// Positive integer from the environment; a set but unusable value falls
/// back to `default` with a warning.
pub fn read_env_u64(name: &str, default: u64) -> u64 {
    parse_positive_u64(name, env::var(name).ok(), default)
}

fn parse_positive_u64(name: &str, value: Option<String>, default: u64) -> u64 {
    let Some(value) = value else {
        return default;
    };
    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => parsed,
        _ => {
            warn!(
                "{} ('{}') is not a positive integer. Falling back to {}.",
                name, value, default
            );
            default
        }
    }
}
