pub mod angle_resolver;
pub mod constants;
pub mod error;
pub mod sector_map;
pub mod shared_wheel_game;
pub mod validation;

pub use angle_resolver::{AngleResolver, AngleSource, Resolution};
pub use error::WheelError;
pub use sector_map::SectorMap;
pub use shared_wheel_game::{AwardVariant, Easing, Prize, Settlement, SettleSource};
pub use validation::{ConfigWarning, WheelConfiguration, WheelOptions};
