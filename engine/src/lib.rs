pub mod animator;
pub mod config;
pub mod console;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod ports;
pub mod spin;

pub use animator::TimedAnimator;
pub use console::{ChannelTrigger, ConsolePresentation};
pub use error::ConfigError;
pub use hooks::{HookResult, SpinHooks};
pub use ports::{AnimationDone, AnimationPort, PresentationPort, TriggerPort};
pub use spin::{SpinCompletion, SpinEngine, SpinEngineBuilder, SpinState};
