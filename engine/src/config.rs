use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use wheel_shared::constants::{DEMO_PRIZES, DEMO_SPECIAL_PRIZE_INDEX};
use wheel_shared::{ConfigWarning, WheelConfiguration, WheelOptions};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "wheel.toml";

/// A validated configuration plus the problems that were patched over while loading it.
#[derive(Debug)]
pub struct LoadedConfig {
    pub configuration: WheelConfiguration,
    /// Already logged during validation.
    pub warnings: Vec<ConfigWarning>,
    pub path: Option<PathBuf>,
}

/// Loads the wheel configuration for the demo host.
///
/// Reads `.env` if present, then `WHEEL_CONFIG` (defaults to `wheel.toml`). The
/// `WHEEL_DURATION_MS`, `WHEEL_MIN_ROTATIONS`, `WHEEL_AUTO_RESET_MS` and `WHEEL_EASING`
/// variables override values from the file.
pub fn load() -> Result<LoadedConfig, ConfigError> {
    dotenvy::from_path(".env").ok();

    let path = env::var("WHEEL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_with(Path::new(&path), |key| env::var(key).ok())
}

/// Same as [`load`] but with an explicit file and variable lookup.
pub fn load_with(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<LoadedConfig, ConfigError> {
    let (mut options, source) = match fs::read_to_string(path) {
        Ok(raw) => (parse_options(&raw)?, Some(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No wheel config at {}; using the demo prize table", path.display());
            (demo_options(), None)
        }
        Err(e) => return Err(e.into()),
    };

    apply_overrides(&mut options, lookup);

    let (configuration, warnings) = options.into_configuration()?;
    Ok(LoadedConfig {
        configuration,
        warnings,
        path: source,
    })
}

pub fn parse_options(raw: &str) -> Result<WheelOptions, ConfigError> {
    Ok(toml_edit::de::from_str(raw)?)
}

pub fn demo_options() -> WheelOptions {
    WheelOptions {
        special_prize_index: Some(DEMO_SPECIAL_PRIZE_INDEX),
        ..WheelOptions::with_prizes(DEMO_PRIZES.clone())
    }
}

fn apply_overrides(options: &mut WheelOptions, lookup: impl Fn(&str) -> Option<String>) {
    let number = |key: &str| -> Option<f64> {
        let raw = lookup(key)?;
        match raw.trim().parse::<f64>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring {}={:?}: not a number", key, raw);
                None
            }
        }
    };

    if let Some(value) = number("WHEEL_DURATION_MS") {
        options.duration_ms = Some(value);
    }
    if let Some(value) = number("WHEEL_MIN_ROTATIONS") {
        options.min_rotations = Some(value);
    }
    if let Some(value) = number("WHEEL_AUTO_RESET_MS") {
        options.auto_reset_delay_ms = Some(value);
    }
    if let Some(easing) = lookup("WHEEL_EASING") {
        options.easing = Some(easing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;
    use wheel_shared::{Easing, WheelError};

    const SAMPLE: &str = r#"
duration_ms = 2500
minSpins = 5
easing = "ease-in-out"
special_prize_index = 1
sparkle = true

[[prizes]]
name = "Gold"
image = "gold.png"
text = "Expires soon"

[[prizes]]
name = "Silver"
image = "silver.png"
hideText = true
"#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("wheel-engine-{}-{}.toml", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_options() {
        let options = parse_options(SAMPLE).unwrap();
        assert_eq!(options.prizes.len(), 2);
        assert_eq!(options.duration_ms, Some(2500.0));
        assert_eq!(options.min_rotations, Some(5.0));
        assert!(options.prizes[1].hide_text);
        assert!(options.unrecognized.contains_key("sparkle"));
    }

    #[test]
    fn test_load_file_with_overrides() {
        let path = write_config("overrides", SAMPLE);
        let env: HashMap<&str, &str> = [("WHEEL_DURATION_MS", "1200"), ("WHEEL_MIN_ROTATIONS", "lots")].into();

        let loaded = load_with(&path, |key| env.get(key).map(|v| v.to_string())).unwrap();
        fs::remove_file(&path).ok();

        let config = &loaded.configuration;
        assert_eq!(config.duration(), Duration::from_millis(1200));
        assert_eq!(config.min_rotations(), 5);
        assert_eq!(config.easing(), Easing::EaseInOut);
        assert_eq!(config.special_prize_index(), Some(1));
        assert_eq!(loaded.warnings, vec![ConfigWarning::UnrecognizedOption("sparkle".to_string())]);
        assert_eq!(loaded.path, Some(path));
    }

    #[test]
    fn test_missing_file_uses_demo_table() {
        let loaded = load_with(Path::new("/nonexistent/wheel.toml"), no_env).unwrap();
        assert_eq!(loaded.configuration.prizes().len(), DEMO_PRIZES.len());
        assert_eq!(loaded.configuration.special_prize_index(), Some(DEMO_SPECIAL_PRIZE_INDEX));
        assert!(loaded.warnings.is_empty());
        assert!(loaded.path.is_none());
    }

    #[test]
    fn test_invalid_override_becomes_warning() {
        let env = |key: &str| (key == "WHEEL_DURATION_MS").then(|| "-50".to_string());
        let loaded = load_with(Path::new("/nonexistent/wheel.toml"), env).unwrap();
        assert_eq!(loaded.configuration.duration(), Duration::from_millis(4000));
        assert_eq!(loaded.warnings, vec![ConfigWarning::InvalidDuration(-50.0)]);
    }

    #[test]
    fn test_empty_prize_list_is_rejected() {
        let path = write_config("empty", "duration_ms = 1000\n");
        let result = load_with(&path, no_env);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::Wheel(WheelError::EmptyPrizes))));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        assert!(matches!(parse_options("prizes = [[["), Err(ConfigError::Parse(_))));
    }
}
