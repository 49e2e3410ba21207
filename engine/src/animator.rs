use std::cell::{Cell, RefCell};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::{self, JoinHandle};
use tokio::time::{sleep, Instant};
use wheel_shared::Easing;

use crate::ports::{AnimationDone, AnimationPort};

#[derive(Debug, Clone, Copy)]
struct Flight {
    from: f64,
    to: f64,
    started_at: Instant,
    duration: Duration,
    easing: Easing,
}

impl Flight {
    fn resting(angle: f64) -> Self {
        Self {
            from: angle,
            to: angle,
            started_at: Instant::now(),
            duration: Duration::ZERO,
            easing: Easing::Linear,
        }
    }

    fn angle_at(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * self.easing.progress(t)
    }
}

/// Headless animation port: interpolates the wheel angle over time with the requested
/// easing and reports completion when the duration has elapsed.
///
/// Must be used inside a `LocalSet`, like the engine itself.
pub struct TimedAnimator {
    flight: Cell<Flight>,
    task: RefCell<Option<JoinHandle<()>>>,
    reports_completion: Cell<bool>,
}

impl TimedAnimator {
    pub fn new() -> Self {
        Self {
            flight: Cell::new(Flight::resting(0.0)),
            task: RefCell::new(None),
            reports_completion: Cell::new(true),
        }
    }

    /// An animator that never reports completion, leaving settlement to the engine's
    /// fallback timer.
    pub fn silent() -> Self {
        let animator = Self::new();
        animator.reports_completion.set(false);
        animator
    }

    pub fn set_reports_completion(&self, reports: bool) {
        self.reports_completion.set(reports);
    }

    pub fn is_silent(&self) -> bool {
        !self.reports_completion.get()
    }

    pub fn is_animating(&self) -> bool {
        let flight = self.flight.get();
        flight.angle_at(Instant::now()) != flight.to
    }

    fn cancel_task(&self) {
        if let Some(handle) = self.task.borrow_mut().take() {
            handle.abort();
        }
    }
}

impl Default for TimedAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimedAnimator {
    fn drop(&mut self) {
        self.cancel_task();
    }
}

impl AnimationPort for TimedAnimator {
    fn animate_to(&self, angle: f64, duration: Duration, easing: Easing) -> AnimationDone {
        let from = self.current_angle();
        self.cancel_task();
        self.flight.set(Flight {
            from,
            to: angle,
            started_at: Instant::now(),
            duration,
            easing,
        });

        let (tx, rx) = oneshot::channel();
        if self.reports_completion.get() {
            let handle = task::spawn_local(async move {
                sleep(duration).await;
                let _ = tx.send(());
            });
            *self.task.borrow_mut() = Some(handle);
        }
        rx
    }

    fn current_angle(&self) -> f64 {
        self.flight.get().angle_at(Instant::now())
    }

    fn snap_to(&self, angle: f64) {
        self.cancel_task();
        self.flight.set(Flight::resting(angle));
    }
}
