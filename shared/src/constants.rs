use once_cell::sync::Lazy;

use crate::shared_wheel_game::Prize;

pub const DEFAULT_DURATION_MS: u64 = 4000;
pub const DEFAULT_MIN_ROTATIONS: u32 = 3;
pub const DEFAULT_AUTO_RESET_DELAY_MS: u64 = 5000;

// Fallback fires this much later than the nominal animation duration
pub const FALLBACK_MARGIN: f64 = 1.1;

pub const FULL_TURN_DEGREES: f64 = 360.0;

pub const EMPTY_PRIZES_ERROR: &str = "Prizes must be a non-empty list";
pub const INVALID_DURATION_WARNING: &str = "Invalid duration; using default value of 4000ms";
pub const INVALID_MIN_ROTATIONS_WARNING: &str = "Invalid min_rotations; using default value of 3";
pub const INVALID_AUTO_RESET_WARNING: &str = "Invalid auto_reset_delay; using default value of 5000ms";

/// Prize table used when no configuration file is supplied.
pub static DEMO_PRIZES: Lazy<Vec<Prize>> = Lazy::new(|| {
    vec![
        Prize::new("Green Agate | Raw Crystal", "images/pop_img/01_pop.jpg"),
        Prize::new("Fortune Gold $100", "images/pop_img/03_pop.jpg")
            .with_text("Expires: 2025-03-20"),
        Prize::new("30-Day Divine Offering", "images/pop_img/04_pop.jpg")
            .with_text("Expires: 2025-03-20"),
        Prize::new("Instant Voucher", "images/pop_award/04_pop.jpg"),
        Prize::new("Thanks for Playing", "images/pop_img/00_pop.jpg").hidden_text(),
        Prize::new("Fortune Gold $50", "images/pop_img/05_pop.jpg")
            .with_text("Expires: 2025-03-20"),
        Prize::new("Zi Wei Career Luck", "images/pop_img/02_pop.jpg")
            .with_text("Expires: 2025-03-20"),
    ]
});

/// Index of the demo prize that gets the special award panel.
pub const DEMO_SPECIAL_PRIZE_INDEX: usize = 2;
