use tokio::time::Instant;

/// Lifecycle of a single wheel. Only the engine moves between these.
#[derive(Debug, Clone, PartialEq)]
pub enum SpinState {
    Idle,
    Spinning {
        target: Option<usize>,
        started_at: Instant,
        terminal_angle: f64,
    },
    Settled {
        prize_index: usize,
        settled_at: Instant,
    },
}

impl SpinState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self, Self::Spinning { .. })
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Spinning { .. } => "spinning",
            Self::Settled { .. } => "settled",
        }
    }
}

impl Default for SpinState {
    fn default() -> Self {
        Self::Idle
    }
}
