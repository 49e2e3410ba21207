use tokio::task::JoinHandle;

/// The two tasks competing to settle one spin: the animation watcher and the fallback
/// timer. Whichever settles first cancels both; settlement itself rejects a second call
/// for the same spin, so an abort that lands late is harmless.
pub(crate) struct CompletionRace {
    pub(crate) spin_id: u64,
    watcher: JoinHandle<()>,
    fallback: JoinHandle<()>,
}

impl CompletionRace {
    pub(crate) fn new(spin_id: u64, watcher: JoinHandle<()>, fallback: JoinHandle<()>) -> Self {
        Self { spin_id, watcher, fallback }
    }

    pub(crate) fn cancel(self) {
        drop(self);
    }
}

impl Drop for CompletionRace {
    fn drop(&mut self) {
        self.watcher.abort();
        self.fallback.abort();
    }
}

/// A single engine-owned background task (timer or listener) that is aborted when
/// replaced or dropped.
#[derive(Default)]
pub(crate) struct TaskSlot(Option<JoinHandle<()>>);

impl TaskSlot {
    pub(crate) fn arm(&mut self, handle: JoinHandle<()>) {
        self.cancel();
        self.0 = Some(handle);
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.0.as_ref().map_or(false, |h| !h.is_finished())
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
