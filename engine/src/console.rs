use std::cell::{Cell, RefCell};

use tokio::sync::mpsc;
use wheel_shared::{AwardVariant, Prize};

use crate::ports::{PresentationPort, TriggerPort};

/// A trigger backed by an in-process channel. `press` behaves like clicking the
/// pointer: it does nothing while the control is disabled.
pub struct ChannelTrigger {
    enabled: Cell<bool>,
    tx: mpsc::UnboundedSender<()>,
    rx: RefCell<Option<mpsc::UnboundedReceiver<()>>>,
}

impl ChannelTrigger {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            enabled: Cell::new(true),
            tx,
            rx: RefCell::new(Some(rx)),
        }
    }

    /// Returns whether the press was delivered.
    pub fn press(&self) -> bool {
        if !self.enabled.get() {
            return false;
        }
        self.tx.send(()).is_ok()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }
}

impl Default for ChannelTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerPort for ChannelTrigger {
    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    fn activations(&self) -> Option<mpsc::UnboundedReceiver<()>> {
        self.rx.borrow_mut().take()
    }
}

/// Prints results to stdout for the demo host.
#[derive(Default)]
pub struct ConsolePresentation {
    visible: Cell<bool>,
    shown: RefCell<Option<Prize>>,
}

impl ConsolePresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn shown(&self) -> Option<Prize> {
        self.shown.borrow().clone()
    }
}

impl PresentationPort for ConsolePresentation {
    fn show_prize(&self, prize: &Prize) {
        *self.shown.borrow_mut() = Some(prize.clone());
    }

    fn clear_prize(&self) {
        self.shown.borrow_mut().take();
    }

    fn set_result_visible(&self, visible: bool) {
        if visible && !self.visible.get() {
            if let Some(prize) = self.shown.borrow().as_ref() {
                println!("\n  🎉 {} [{}]", prize.name, prize.image);
                if let Some(text) = prize.display_text() {
                    println!("     {}", text);
                }
            }
        } else if !visible && self.visible.get() {
            println!("  (result hidden)");
        }
        self.visible.set(visible);
    }

    fn show_award(&self, variant: AwardVariant) {
        if variant == AwardVariant::Special {
            println!("  ⭐ Special award!");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_trigger_swallows_presses() {
        let trigger = ChannelTrigger::new();
        let mut rx = trigger.activations().unwrap();
        assert!(trigger.activations().is_none());

        assert!(trigger.press());
        trigger.set_enabled(false);
        assert!(!trigger.press());

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_console_presentation_tracks_prize() {
        let presentation = ConsolePresentation::new();
        presentation.show_prize(&Prize::new("Gold", "gold.png"));
        presentation.set_result_visible(true);
        assert!(presentation.is_visible());
        assert_eq!(presentation.shown().map(|p| p.name), Some("Gold".to_string()));

        presentation.set_result_visible(false);
        presentation.clear_prize();
        assert!(!presentation.is_visible());
        assert!(presentation.shown().is_none());
    }
}
