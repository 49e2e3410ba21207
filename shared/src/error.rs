use std::fmt;

/// Fatal configuration problems. A wheel is never constructed when one of these occurs.
#[derive(Debug, Clone, PartialEq)]
pub enum WheelError {
    EmptyPrizes,
    InvalidPrize { index: usize, reason: String },
    MissingAnchor(&'static str),
}

impl fmt::Display for WheelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPrizes => write!(f, "{}", crate::constants::EMPTY_PRIZES_ERROR),
            Self::InvalidPrize { index, reason } => write!(f, "Invalid prize at index {}: {}", index, reason),
            Self::MissingAnchor(name) => write!(f, "Missing required wheel anchor: {}", name),
        }
    }
}

impl std::error::Error for WheelError {}
