use serde::{Serialize, Deserialize};
use strum::{Display, EnumString};
use validator::Validate;

/// A single prize on the wheel. Each prize owns one equal-width sector.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
pub struct Prize {
    #[validate(length(min = 1, message = "Prize name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, alias = "hideText")]
    pub hide_text: bool,
}

impl Prize {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            text: None,
            hide_text: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn hidden_text(mut self) -> Self {
        self.hide_text = true;
        self
    }

    /// Text to render next to the prize, if any should be shown at all.
    pub fn display_text(&self) -> Option<&str> {
        if self.hide_text {
            return None;
        }
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// Timing curve requested from the animation port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    Ease,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn progress(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            // Quartic deceleration: 1 - (1-t)^4
            Self::EaseOut => 1.0 - (1.0 - t).powi(4),
            // No separate curve for `ease`; it decelerates like `ease-in-out`
            Self::Ease | Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Which result panel to reveal once a spin settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AwardVariant {
    Standard,
    Special,
}

/// Which completion signal performed settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettleSource {
    Animation,
    Fallback,
}

/// Outcome of a single spin, committed exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub index: usize,
    pub prize: Prize,
    pub terminal_angle: f64,
    pub source: SettleSource,
}
