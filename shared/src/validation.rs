use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Serialize, Deserialize};
use validator::Validate;

use crate::constants::*;
use crate::error::WheelError;
use crate::sector_map::SectorMap;
use crate::shared_wheel_game::{Easing, Prize};

/// Raw wheel options as they arrive from a config file or the embedding application.
///
/// Numeric fields are kept loose (`f64`) so that out-of-range or fractional values can
/// be replaced by defaults instead of failing the whole load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WheelOptions {
    #[serde(default)]
    pub prizes: Vec<Prize>,
    #[serde(default, alias = "duration")]
    pub duration_ms: Option<f64>,
    #[serde(default, alias = "minSpins", alias = "min_spins")]
    pub min_rotations: Option<f64>,
    #[serde(default, alias = "autoResetDelay")]
    pub auto_reset_delay_ms: Option<f64>,
    #[serde(default)]
    pub easing: Option<String>,
    #[serde(default, alias = "specialPrizeIndex")]
    pub special_prize_index: Option<usize>,
    #[serde(flatten)]
    pub unrecognized: BTreeMap<String, serde_json::Value>,
}

/// A recoverable problem found while validating options.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    InvalidDuration(f64),
    InvalidMinRotations(f64),
    InvalidAutoResetDelay(f64),
    UnknownEasing(String),
    SpecialPrizeOutOfRange(usize),
    UnrecognizedOption(String),
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDuration(v) => write!(f, "{} (got {})", INVALID_DURATION_WARNING, v),
            Self::InvalidMinRotations(v) => write!(f, "{} (got {})", INVALID_MIN_ROTATIONS_WARNING, v),
            Self::InvalidAutoResetDelay(v) => write!(f, "{} (got {})", INVALID_AUTO_RESET_WARNING, v),
            Self::UnknownEasing(name) => write!(f, "Unknown easing '{}'; using ease-out", name),
            Self::SpecialPrizeOutOfRange(i) => write!(f, "special_prize_index {} is not a prize index; ignoring it", i),
            Self::UnrecognizedOption(key) => write!(f, "Unrecognized wheel option '{}' ignored", key),
        }
    }
}

/// Validated, immutable wheel configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelConfiguration {
    prizes: Vec<Prize>,
    duration: Duration,
    min_rotations: u32,
    auto_reset_delay: Duration,
    easing: Easing,
    special_prize_index: Option<usize>,
    sectors: SectorMap,
}

impl WheelConfiguration {
    /// Builds a configuration with all defaults for the given prizes.
    pub fn new(prizes: Vec<Prize>) -> Result<Self, WheelError> {
        WheelOptions::with_prizes(prizes).into_configuration().map(|(config, _)| config)
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn min_rotations(&self) -> u32 {
        self.min_rotations
    }

    pub fn auto_reset_delay(&self) -> Duration {
        self.auto_reset_delay
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn special_prize_index(&self) -> Option<usize> {
        self.special_prize_index
    }

    pub fn sectors(&self) -> SectorMap {
        self.sectors
    }

    /// How long the engine waits for the animation port before settling on its own.
    pub fn fallback_delay(&self) -> Duration {
        self.duration.mul_f64(FALLBACK_MARGIN)
    }
}

fn positive_integer(value: f64) -> Option<u64> {
    (value.is_finite() && value.fract() == 0.0 && value >= 1.0 && value <= u32::MAX as f64).then_some(value as u64)
}

fn non_negative_integer(value: f64) -> Option<u64> {
    (value.is_finite() && value.fract() == 0.0 && value >= 0.0 && value <= u32::MAX as f64).then_some(value as u64)
}

impl WheelOptions {
    pub fn with_prizes(prizes: Vec<Prize>) -> Self {
        Self {
            prizes,
            ..Self::default()
        }
    }

    /// Validates the options. Empty or invalid prizes are fatal; every other problem is
    /// replaced by its default and reported as a warning (also logged).
    pub fn into_configuration(self) -> Result<(WheelConfiguration, Vec<ConfigWarning>), WheelError> {
        if self.prizes.is_empty() {
            return Err(WheelError::EmptyPrizes);
        }
        for (index, prize) in self.prizes.iter().enumerate() {
            prize.validate().map_err(|e| WheelError::InvalidPrize {
                index,
                reason: e.to_string(),
            })?;
        }
        let sectors = SectorMap::new(self.prizes.len())?;

        let mut warnings = Vec::new();

        let duration_ms = match self.duration_ms {
            None => DEFAULT_DURATION_MS,
            Some(v) => positive_integer(v).unwrap_or_else(|| {
                warnings.push(ConfigWarning::InvalidDuration(v));
                DEFAULT_DURATION_MS
            }),
        };

        let min_rotations = match self.min_rotations {
            None => DEFAULT_MIN_ROTATIONS,
            Some(v) => positive_integer(v).map(|n| n as u32).unwrap_or_else(|| {
                warnings.push(ConfigWarning::InvalidMinRotations(v));
                DEFAULT_MIN_ROTATIONS
            }),
        };

        let auto_reset_ms = match self.auto_reset_delay_ms {
            None => DEFAULT_AUTO_RESET_DELAY_MS,
            Some(v) => non_negative_integer(v).unwrap_or_else(|| {
                warnings.push(ConfigWarning::InvalidAutoResetDelay(v));
                DEFAULT_AUTO_RESET_DELAY_MS
            }),
        };

        let easing = match self.easing.as_deref() {
            None => Easing::default(),
            Some(name) => Easing::from_str(name.trim()).unwrap_or_else(|_| {
                warnings.push(ConfigWarning::UnknownEasing(name.to_string()));
                Easing::default()
            }),
        };

        let special_prize_index = match self.special_prize_index {
            Some(i) if i >= self.prizes.len() => {
                warnings.push(ConfigWarning::SpecialPrizeOutOfRange(i));
                None
            }
            other => other,
        };

        for key in self.unrecognized.keys() {
            warnings.push(ConfigWarning::UnrecognizedOption(key.clone()));
        }

        for warning in &warnings {
            log::warn!("{}", warning);
        }

        let config = WheelConfiguration {
            prizes: self.prizes,
            duration: Duration::from_millis(duration_ms),
            min_rotations,
            auto_reset_delay: Duration::from_millis(auto_reset_ms),
            easing,
            special_prize_index,
            sectors,
        };
        Ok((config, warnings))
    }
}
