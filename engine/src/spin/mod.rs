//! The spin engine: a single-threaded state machine driving one wheel.
//!
//! All methods must be called from within a `tokio::task::LocalSet`; timers and the
//! trigger listener are `spawn_local` tasks that only hold weak references back to the
//! engine.

mod race;
mod state;

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::sync::{mpsc, oneshot};
use tokio::task;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};
use wheel_shared::{
    AngleResolver, AngleSource, AwardVariant, Prize, Settlement, SettleSource, WheelConfiguration, WheelError,
};

use crate::hooks::SpinHooks;
use crate::ports::{AnimationDone, AnimationPort, PresentationPort, TriggerPort};
use race::{CompletionRace, TaskSlot};

pub use state::SpinState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResetCause {
    Auto,
    Explicit,
    Teardown,
}

struct Machine {
    state: SpinState,
    spin_id: u64,
    current_prize: Option<usize>,
    race: Option<CompletionRace>,
    reset_timer: TaskSlot,
    trigger_listener: TaskSlot,
    waiter: Option<oneshot::Sender<Settlement>>,
    destroyed: bool,
}

struct Shared {
    config: WheelConfiguration,
    resolver: AngleResolver,
    animation: Rc<dyn AnimationPort>,
    presentation: Rc<dyn PresentationPort>,
    trigger: Rc<dyn TriggerPort>,
    hooks: SpinHooks,
    rng: RefCell<Box<dyn RngCore>>,
    machine: RefCell<Machine>,
}

/// Handle to a wheel. Cloning shares the same engine.
#[derive(Clone)]
pub struct SpinEngine {
    shared: Rc<Shared>,
}

/// Resolves with the spin's settlement, or `None` if the spin was cancelled by a reset
/// or teardown before it settled.
pub struct SpinCompletion {
    rx: oneshot::Receiver<Settlement>,
}

impl Future for SpinCompletion {
    type Output = Option<Settlement>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(Result::ok)
    }
}

pub struct SpinEngineBuilder {
    config: WheelConfiguration,
    animation: Option<Rc<dyn AnimationPort>>,
    presentation: Option<Rc<dyn PresentationPort>>,
    trigger: Option<Rc<dyn TriggerPort>>,
    hooks: SpinHooks,
    rng: Option<Box<dyn RngCore>>,
}

impl SpinEngineBuilder {
    pub fn animation(mut self, port: Rc<dyn AnimationPort>) -> Self {
        self.animation = Some(port);
        self
    }

    pub fn presentation(mut self, port: Rc<dyn PresentationPort>) -> Self {
        self.presentation = Some(port);
        self
    }

    pub fn trigger(mut self, port: Rc<dyn TriggerPort>) -> Self {
        self.trigger = Some(port);
        self
    }

    pub fn hooks(mut self, hooks: SpinHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Source of randomness for untargeted spins. Defaults to an entropy-seeded `StdRng`.
    pub fn rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Builds the engine and starts listening to the trigger. A missing port is a fatal
    /// configuration error.
    pub fn build(self) -> Result<SpinEngine, WheelError> {
        let animation = self.animation.ok_or(WheelError::MissingAnchor("animation"))?;
        let presentation = self.presentation.ok_or(WheelError::MissingAnchor("presentation"))?;
        let trigger = self.trigger.ok_or(WheelError::MissingAnchor("trigger"))?;
        let activations = trigger.activations().ok_or(WheelError::MissingAnchor("trigger activations"))?;

        let resolver = AngleResolver::new(self.config.sectors(), self.config.min_rotations());
        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(StdRng::from_entropy()) as Box<dyn RngCore>);

        let shared = Rc::new(Shared {
            config: self.config,
            resolver,
            animation,
            presentation,
            trigger,
            hooks: self.hooks,
            rng: RefCell::new(rng),
            machine: RefCell::new(Machine {
                state: SpinState::Idle,
                spin_id: 0,
                current_prize: None,
                race: None,
                reset_timer: TaskSlot::default(),
                trigger_listener: TaskSlot::default(),
                waiter: None,
                destroyed: false,
            }),
        });

        let listener = listen(Rc::downgrade(&shared), activations);
        shared.machine.borrow_mut().trigger_listener.arm(listener);
        shared.trigger.set_enabled(true);

        info!(
            "Wheel ready with {} prizes ({}ms spin, {} rotations)",
            shared.config.prizes().len(),
            shared.config.duration().as_millis(),
            shared.config.min_rotations()
        );
        Ok(SpinEngine { shared })
    }
}

fn listen(weak: Weak<Shared>, mut activations: mpsc::UnboundedReceiver<()>) -> task::JoinHandle<()> {
    task::spawn_local(async move {
        while activations.recv().await.is_some() {
            let shared = match weak.upgrade() {
                Some(shared) => shared,
                None => break,
            };
            let engine = SpinEngine { shared };
            if engine.state().is_idle() {
                engine.spin(None);
            }
        }
        debug!("Trigger listener stopped");
    })
}

impl SpinEngine {
    pub fn builder(config: WheelConfiguration) -> SpinEngineBuilder {
        SpinEngineBuilder {
            config,
            animation: None,
            presentation: None,
            trigger: None,
            hooks: SpinHooks::default(),
            rng: None,
        }
    }

    /// Starts a spin, optionally towards a specific prize index.
    ///
    /// Returns `None` without doing anything if the wheel is not idle or has been
    /// destroyed. An out-of-range target falls back to a random outcome.
    pub fn spin(&self, target: Option<usize>) -> Option<SpinCompletion> {
        let shared = &self.shared;
        let current_angle = shared.animation.current_angle();

        let (spin_id, resolution, completion) = {
            let mut machine = shared.machine.borrow_mut();
            if machine.destroyed {
                debug!("Spin ignored; wheel has been destroyed");
                return None;
            }
            if !machine.state.is_idle() {
                debug!("Spin ignored; wheel is {}", machine.state.label());
                return None;
            }

            let resolution = {
                let mut rng = shared.rng.borrow_mut();
                shared.resolver.terminal_angle(target, current_angle, &mut **rng)
            };

            machine.spin_id += 1;
            machine.current_prize = None;
            machine.state = SpinState::Spinning {
                target,
                started_at: Instant::now(),
                terminal_angle: resolution.terminal_angle,
            };
            let (tx, rx) = oneshot::channel();
            machine.waiter = Some(tx);
            (machine.spin_id, resolution, SpinCompletion { rx })
        };

        shared.hooks.fire_start();
        if !self.is_current_spin(spin_id) {
            // A start hook reset or destroyed the wheel
            return Some(completion);
        }

        shared.trigger.set_enabled(false);

        if let AngleSource::OutOfRangeFallback { requested } = resolution.source {
            warn!(
                "Target index {} is outside 0..{}; spinning to a random prize instead",
                requested,
                shared.config.prizes().len()
            );
        }
        info!("🎡 Spin {} started towards {:.1}°", spin_id, resolution.terminal_angle);

        let done = shared
            .animation
            .animate_to(resolution.terminal_angle, shared.config.duration(), shared.config.easing());
        self.arm_race(spin_id, done);

        Some(completion)
    }

    fn arm_race(&self, spin_id: u64, done: AnimationDone) {
        let watcher = {
            let engine = Rc::downgrade(&self.shared);
            task::spawn_local(async move {
                if done.await.is_err() {
                    debug!("Animation for spin {} will not report completion", spin_id);
                    return;
                }
                if let Some(shared) = engine.upgrade() {
                    SpinEngine { shared }.settle(spin_id, SettleSource::Animation);
                }
            })
        };

        let fallback = {
            let engine = Rc::downgrade(&self.shared);
            let delay = self.shared.config.fallback_delay();
            task::spawn_local(async move {
                sleep(delay).await;
                if let Some(shared) = engine.upgrade() {
                    SpinEngine { shared }.settle(spin_id, SettleSource::Fallback);
                }
            })
        };

        let mut machine = self.shared.machine.borrow_mut();
        if let Some(previous) = machine.race.replace(CompletionRace::new(spin_id, watcher, fallback)) {
            debug!("Cancelled completion race for spin {}", previous.spin_id);
            previous.cancel();
        }
    }

    /// Commits the outcome of `spin_id`. Only the first call for a spin has any effect.
    fn settle(&self, spin_id: u64, source: SettleSource) {
        let shared = &self.shared;

        let (settlement, waiter) = {
            let mut machine = shared.machine.borrow_mut();
            let terminal_angle = match machine.state {
                SpinState::Spinning { terminal_angle, .. } if machine.spin_id == spin_id && !machine.destroyed => {
                    terminal_angle
                }
                _ => {
                    debug!("Settlement of spin {} via {:?} suppressed", spin_id, source);
                    return;
                }
            };

            let index = shared.config.sectors().index_at_pointer(terminal_angle);
            machine.state = SpinState::Settled {
                prize_index: index,
                settled_at: Instant::now(),
            };
            machine.current_prize = Some(index);
            if let Some(race) = machine.race.take() {
                race.cancel();
            }

            let settlement = Settlement {
                index,
                prize: shared.config.prizes()[index].clone(),
                terminal_angle,
                source,
            };
            (settlement, machine.waiter.take())
        };

        if source == SettleSource::Fallback {
            debug!("Animation did not report completion in time; settled by fallback timer");
        }
        info!("🎯 Spin {} settled on {} (index {})", spin_id, settlement.prize.name, settlement.index);

        shared.presentation.show_prize(&settlement.prize);
        shared.presentation.set_result_visible(true);
        let variant = if shared.config.special_prize_index() == Some(settlement.index) {
            AwardVariant::Special
        } else {
            AwardVariant::Standard
        };
        shared.presentation.show_award(variant);

        shared.hooks.fire_end(&settlement.prize, settlement.index);

        {
            let mut machine = shared.machine.borrow_mut();
            if machine.spin_id == spin_id && machine.state.is_settled() && !machine.destroyed {
                let engine = Rc::downgrade(shared);
                let delay = shared.config.auto_reset_delay();
                machine.reset_timer.arm(task::spawn_local(async move {
                    sleep(delay).await;
                    if let Some(shared) = engine.upgrade() {
                        SpinEngine { shared }.auto_reset(spin_id);
                    }
                }));
            }
        }

        if let Some(waiter) = waiter {
            let _ = waiter.send(settlement);
        }
    }

    fn auto_reset(&self, spin_id: u64) {
        let stale = {
            let machine = self.shared.machine.borrow();
            machine.spin_id != spin_id || !machine.state.is_settled() || machine.destroyed
        };
        if stale {
            return;
        }
        self.reset_now(ResetCause::Auto);
    }

    /// Returns the wheel to idle immediately, cancelling any pending spin or timer.
    pub fn reset(&self) {
        if self.shared.machine.borrow().destroyed {
            debug!("Reset ignored; wheel has been destroyed");
            return;
        }
        self.reset_now(ResetCause::Explicit);
    }

    fn reset_now(&self, cause: ResetCause) {
        let shared = &self.shared;
        {
            let mut machine = shared.machine.borrow_mut();
            machine.reset_timer.cancel();
            if let Some(race) = machine.race.take() {
                race.cancel();
            }
            machine.state = SpinState::Idle;
            // Dropping the sender resolves a pending SpinCompletion with None
            machine.waiter = None;
        }

        shared.animation.snap_to(0.0);
        // A torn-down wheel no longer listens, so its control stays off
        shared.trigger.set_enabled(cause != ResetCause::Teardown);
        shared.presentation.set_result_visible(false);
        shared.presentation.hide_awards();
        shared.presentation.clear_prize();
        debug!("Wheel reset ({:?})", cause);

        shared.hooks.fire_reset();
    }

    /// Tears the engine down: stops listening to the trigger, cancels every timer and
    /// resets the wheel. Later calls on this engine are ignored.
    pub fn destroy(&self) {
        {
            let mut machine = self.shared.machine.borrow_mut();
            if machine.destroyed {
                debug!("Destroy ignored; wheel has already been destroyed");
                return;
            }
            machine.destroyed = true;
            machine.trigger_listener.cancel();
        }
        self.reset_now(ResetCause::Teardown);
        info!("Wheel destroyed");
    }

    fn is_current_spin(&self, spin_id: u64) -> bool {
        let machine = self.shared.machine.borrow();
        machine.spin_id == spin_id && machine.state.is_spinning() && !machine.destroyed
    }

    pub fn state(&self) -> SpinState {
        self.shared.machine.borrow().state.clone()
    }

    pub fn is_spinning(&self) -> bool {
        self.shared.machine.borrow().state.is_spinning()
    }

    pub fn is_destroyed(&self) -> bool {
        self.shared.machine.borrow().destroyed
    }

    /// The prize of the most recent settled spin. Cleared when the next spin starts.
    pub fn current_prize(&self) -> Option<Prize> {
        let index = self.shared.machine.borrow().current_prize?;
        self.shared.config.prizes().get(index).cloned()
    }

    pub fn list_prizes(&self) -> Vec<Prize> {
        self.shared.config.prizes().to_vec()
    }

    pub fn current_rotation(&self) -> f64 {
        self.shared.animation.current_angle()
    }

    pub fn config(&self) -> &WheelConfiguration {
        &self.shared.config
    }

    /// Whether a fallback, animation watcher or auto-reset timer is still armed.
    pub fn has_pending_timers(&self) -> bool {
        let machine = self.shared.machine.borrow();
        machine.race.is_some() || machine.reset_timer.is_armed()
    }
}
