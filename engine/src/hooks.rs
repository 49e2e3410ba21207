use std::error::Error;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use wheel_shared::Prize;

pub type HookResult = Result<(), Box<dyn Error>>;

/// Optional notifications supplied by the embedding application.
///
/// A hook that returns an error or panics is logged and otherwise ignored; it never
/// stops the wheel from moving to its next state.
#[derive(Clone, Default)]
pub struct SpinHooks {
    pub on_start: Option<Rc<dyn Fn() -> HookResult>>,
    pub on_end: Option<Rc<dyn Fn(&Prize, usize) -> HookResult>>,
    pub on_reset: Option<Rc<dyn Fn() -> HookResult>>,
}

impl SpinHooks {
    pub fn on_start(mut self, f: impl Fn() -> HookResult + 'static) -> Self {
        self.on_start = Some(Rc::new(f));
        self
    }

    pub fn on_end(mut self, f: impl Fn(&Prize, usize) -> HookResult + 'static) -> Self {
        self.on_end = Some(Rc::new(f));
        self
    }

    pub fn on_reset(mut self, f: impl Fn() -> HookResult + 'static) -> Self {
        self.on_reset = Some(Rc::new(f));
        self
    }

    pub(crate) fn fire_start(&self) {
        if let Some(hook) = self.on_start.clone() {
            isolate("on_start", || hook());
        }
    }

    pub(crate) fn fire_end(&self, prize: &Prize, index: usize) {
        if let Some(hook) = self.on_end.clone() {
            isolate("on_end", || hook(prize, index));
        }
    }

    pub(crate) fn fire_reset(&self) {
        if let Some(hook) = self.on_reset.clone() {
            isolate("on_reset", || hook());
        }
    }
}

fn isolate(name: &str, f: impl FnOnce() -> HookResult) {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("{} hook error: {}", name, e),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::warn!("{} hook panicked: {}", name, message);
        }
    }
}
