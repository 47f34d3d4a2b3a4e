//! # View History
//!
//! Screen-level back/forward history, separate from element focus.
//!
//! The bottom entry is the root view and is never popped. A back press at
//! the root arms a confirmation window instead; a second press inside the
//! window calls the exit capability.
//!
//! ```text
//!             go_back (depth > 1)
//!   [root, a, b] ─────────────────▶ [root, a]
//!
//!   [root]  go_back   ┌───────────┐  go_back < window   ┌──────┐
//!   ─────────────────▶│ ExitArmed │────────────────────▶│ exit │
//!                     └───────────┘                     └──────┘
//!                          │ window elapsed (tick or next press)
//!                          ▼
//!                       unarmed
//! ```
//!
//! The window is a single-shot timer represented by the arming instant.
//! `tick` fires it, and a late second press is treated as a fresh first
//! press rather than compounding.

use log::{debug, info};
use std::fmt;
use std::time::{Duration, Instant};

/// Default double-press window at the root.
pub const DEFAULT_EXIT_WINDOW: Duration = Duration::from_millis(1000);

/// What a back press did to the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackOutcome {
    /// Popped one view; this is the new current view.
    Popped(String),
    /// First press at the root; the confirmation window is now open.
    ExitArmed,
    /// Second press inside the window; the exit capability was invoked.
    ExitRequested,
}

pub struct ViewHistory {
    stack: Vec<String>,
    forward: Vec<String>,
    exit_window: Duration,
    armed_at: Option<Instant>,
    on_exit: Option<Box<dyn FnMut()>>,
}

impl ViewHistory {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            stack: vec![root.into()],
            forward: Vec::new(),
            exit_window: DEFAULT_EXIT_WINDOW,
            armed_at: None,
            on_exit: None,
        }
    }

    pub fn with_exit_window(mut self, window: Duration) -> Self {
        self.exit_window = window;
        self
    }

    /// Install the platform exit capability.
    pub fn on_exit(mut self, handler: impl FnMut() + 'static) -> Self {
        self.on_exit = Some(Box::new(handler));
        self
    }

    pub fn set_exit_handler(&mut self, handler: impl FnMut() + 'static) {
        self.on_exit = Some(Box::new(handler));
    }

    pub fn exit_window(&self) -> Duration {
        self.exit_window
    }

    pub fn current(&self) -> &str {
        // The root is never popped, so the stack is never empty.
        self.stack.last().map(String::as_str).unwrap_or_default()
    }

    pub fn root(&self) -> &str {
        self.stack.first().map(String::as_str).unwrap_or_default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn entries(&self) -> &[String] {
        &self.stack
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    pub fn is_exit_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Push a view; it becomes current. Clears forward history.
    pub fn navigate_to(&mut self, view: impl Into<String>) {
        let view = view.into();
        info!("Navigate: {} -> {}", self.current(), view);
        self.stack.push(view);
        self.forward.clear();
        self.armed_at = None;
    }

    pub fn go_back(&mut self) -> BackOutcome {
        self.go_back_at(Instant::now())
    }

    pub fn go_back_at(&mut self, now: Instant) -> BackOutcome {
        if self.stack.len() > 1 {
            if let Some(popped) = self.stack.pop() {
                self.forward.push(popped);
            }
            info!("Back: now at {}", self.current());
            return BackOutcome::Popped(self.current().to_string());
        }

        match self.armed_at {
            Some(armed) if now.saturating_duration_since(armed) < self.exit_window => {
                self.armed_at = None;
                info!("Second back press at root within {:?}, exiting", self.exit_window);
                if let Some(exit) = self.on_exit.as_mut() {
                    exit();
                }
                BackOutcome::ExitRequested
            }
            _ => {
                debug!("Back press at root, exit armed for {:?}", self.exit_window);
                self.armed_at = Some(now);
                BackOutcome::ExitArmed
            }
        }
    }

    /// Re-enter the most recently popped view, if any.
    pub fn go_forward(&mut self) -> Option<String> {
        let view = self.forward.pop()?;
        info!("Forward: {} -> {}", self.current(), view);
        self.stack.push(view.clone());
        self.armed_at = None;
        Some(view)
    }

    /// Collapse to the root view and clear the exit-confirmation state.
    pub fn reset_navigation(&mut self) {
        debug!("Resetting view history to {}", self.root());
        self.stack.truncate(1);
        self.forward.clear();
        self.armed_at = None;
    }

    /// Fire the confirmation timer if its window has elapsed. Returns true
    /// when it fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.armed_at {
            Some(armed) if now.saturating_duration_since(armed) >= self.exit_window => {
                debug!("Exit confirmation window elapsed");
                self.armed_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel_exit_timer(&mut self) {
        self.armed_at = None;
    }
}

impl fmt::Debug for ViewHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHistory")
            .field("stack", &self.stack)
            .field("forward", &self.forward)
            .field("exit_window", &self.exit_window)
            .field("armed_at", &self.armed_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ExitCounter;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_new_starts_at_root() {
        let h = ViewHistory::new("home");
        assert_eq!(h.current(), "home");
        assert_eq!(h.root(), "home");
        assert_eq!(h.depth(), 1);
        assert!(!h.can_go_back());
    }

    #[test]
    fn test_navigate_then_back_restores_previous() {
        let mut h = ViewHistory::new("home");
        h.navigate_to("movies");
        h.navigate_to("settings");
        assert_eq!(h.current(), "settings");

        assert_eq!(h.go_back(), BackOutcome::Popped("movies".to_string()));
        assert_eq!(h.current(), "movies");
        assert_eq!(h.entries(), &["home".to_string(), "movies".to_string()]);
    }

    #[test]
    fn test_double_press_within_window_exits_once() {
        let exits = ExitCounter::new();
        let mut h = ViewHistory::new("home").on_exit(exits.handler());
        let t0 = Instant::now();

        assert_eq!(h.go_back_at(t0), BackOutcome::ExitArmed);
        assert!(h.is_exit_armed());
        assert_eq!(h.go_back_at(t0 + ms(400)), BackOutcome::ExitRequested);
        assert_eq!(exits.count(), 1);
        assert!(!h.is_exit_armed());
        assert_eq!(h.current(), "home");
    }

    #[test]
    fn test_presses_spaced_by_window_do_not_exit() {
        let exits = ExitCounter::new();
        let mut h = ViewHistory::new("home").on_exit(exits.handler());
        let t0 = Instant::now();

        assert_eq!(h.go_back_at(t0), BackOutcome::ExitArmed);
        assert_eq!(h.go_back_at(t0 + ms(1000)), BackOutcome::ExitArmed);
        assert_eq!(exits.count(), 0);

        // The late press opened a fresh window
        assert_eq!(h.go_back_at(t0 + ms(1500)), BackOutcome::ExitRequested);
        assert_eq!(exits.count(), 1);
    }

    #[test]
    fn test_tick_resets_without_second_press() {
        let mut h = ViewHistory::new("home");
        let t0 = Instant::now();
        h.go_back_at(t0);
        assert!(!h.tick(t0 + ms(999)));
        assert!(h.is_exit_armed());
        assert!(h.tick(t0 + ms(1000)));
        assert!(!h.is_exit_armed());
        assert!(!h.tick(t0 + ms(2000)));
    }

    #[test]
    fn test_third_press_after_exit_rearms() {
        let exits = ExitCounter::new();
        let mut h = ViewHistory::new("home").on_exit(exits.handler());
        let t0 = Instant::now();
        h.go_back_at(t0);
        h.go_back_at(t0 + ms(100));
        assert_eq!(h.go_back_at(t0 + ms(200)), BackOutcome::ExitArmed);
        assert_eq!(exits.count(), 1);
    }

    #[test]
    fn test_pop_does_not_touch_exit_state() {
        let mut h = ViewHistory::new("home");
        h.navigate_to("movies");
        let t0 = Instant::now();
        assert_eq!(h.go_back_at(t0), BackOutcome::Popped("home".to_string()));
        assert!(!h.is_exit_armed());
        assert_eq!(h.go_back_at(t0 + ms(10)), BackOutcome::ExitArmed);
    }

    #[test]
    fn test_custom_window() {
        let mut h = ViewHistory::new("home").with_exit_window(ms(250));
        let t0 = Instant::now();
        h.go_back_at(t0);
        assert_eq!(h.go_back_at(t0 + ms(300)), BackOutcome::ExitArmed);
        assert_eq!(h.exit_window(), ms(250));
    }

    #[test]
    fn test_forward_after_back() {
        let mut h = ViewHistory::new("home");
        h.navigate_to("movies");
        h.go_back();
        assert!(h.can_go_forward());
        assert_eq!(h.go_forward().as_deref(), Some("movies"));
        assert_eq!(h.current(), "movies");
        assert_eq!(h.go_forward(), None);
    }

    #[test]
    fn test_navigate_clears_forward() {
        let mut h = ViewHistory::new("home");
        h.navigate_to("movies");
        h.go_back();
        h.navigate_to("settings");
        assert!(!h.can_go_forward());
    }

    #[test]
    fn test_reset_navigation() {
        let mut h = ViewHistory::new("home");
        h.navigate_to("movies");
        h.navigate_to("detail");
        h.go_back();
        h.reset_navigation();
        assert_eq!(h.depth(), 1);
        assert_eq!(h.current(), "home");
        assert!(!h.can_go_forward());

        let t0 = Instant::now();
        h.go_back_at(t0);
        h.reset_navigation();
        assert!(!h.is_exit_armed());
    }

    #[test]
    fn test_cancel_exit_timer() {
        let exits = ExitCounter::new();
        let mut h = ViewHistory::new("home").on_exit(exits.handler());
        let t0 = Instant::now();
        h.go_back_at(t0);
        h.cancel_exit_timer();
        assert_eq!(h.go_back_at(t0 + ms(10)), BackOutcome::ExitArmed);
        assert_eq!(exits.count(), 0);
    }
}
