use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use wheel_shared::{AwardVariant, Easing, Prize};

/// Fired once when a requested rotation has visually finished. Dropping the sender
/// without firing is treated as "never finishes"; the engine's fallback timer covers it.
pub type AnimationDone = oneshot::Receiver<()>;

/// Drives the visual rotation of the wheel.
pub trait AnimationPort {
    /// Starts animating from the current angle to `angle` (absolute, in degrees).
    fn animate_to(&self, angle: f64, duration: Duration, easing: Easing) -> AnimationDone;

    /// The wheel's current accumulated visual angle in degrees.
    fn current_angle(&self) -> f64;

    /// Moves the wheel to `angle` instantly, cancelling any running animation.
    fn snap_to(&self, angle: f64);
}

/// Displays the settled prize.
pub trait PresentationPort {
    fn show_prize(&self, prize: &Prize);

    fn clear_prize(&self);

    fn set_result_visible(&self, visible: bool);

    fn show_award(&self, _variant: AwardVariant) {}

    fn hide_awards(&self) {}
}

/// The control a player activates to request a spin.
pub trait TriggerPort {
    fn set_enabled(&self, enabled: bool);

    /// Stream of activations. Taken once when the engine is built; `None` means the
    /// trigger has already been claimed by another engine.
    fn activations(&self) -> Option<mpsc::UnboundedReceiver<()>>;
}
