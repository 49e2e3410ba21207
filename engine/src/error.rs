use std::fmt;
use std::io;

use wheel_shared::WheelError;

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml_edit::de::Error),
    Wheel(WheelError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Could not read wheel config: {}", e),
            Self::Parse(e) => write!(f, "Invalid wheel config: {}", e),
            Self::Wheel(e) => write!(f, "Wheel config rejected: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Wheel(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<toml_edit::de::Error> for ConfigError {
    fn from(err: toml_edit::de::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<WheelError> for ConfigError {
    fn from(err: WheelError) -> Self {
        Self::Wheel(err)
    }
}
