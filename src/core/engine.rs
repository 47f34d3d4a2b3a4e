//! # Spatial Navigation Engine
//!
//! Turns D-pad signals into focus changes for one navigation root.
//!
//! ## Nearest-neighbour search
//!
//! For a directional signal the engine:
//!
//! 1. Resolves the focused descriptor's rectangle (live, via its provider).
//!    With nothing focused it targets `initial_focus_id`, else the first
//!    live descriptor, and stops there.
//! 2. Collects live, enabled candidates other than the current one, first
//!    from the current section, then from the whole registry if the section
//!    pass found nothing.
//! 3. Keeps candidates on the correct side of the current centre line.
//! 4. Ranks them by `score = primary gap + alignment_weight *
//!    |perpendicular offset|`, then registration order. Among candidates
//!    that share grid hints with the current element, the smaller hint
//!    delta wins first; the best of those then competes with the best
//!    unhinted candidate on geometry alone.
//! 5. Commits the winner through `FocusRegistry::set_focus`.
//!
//! No surviving candidate means focus stays put. That is normal during key
//! repeat at an edge and is not reported as a failure.

use log::{debug, trace};
use std::cmp::Ordering;
use std::fmt;
use std::time::Instant;

use crate::core::geometry::{Bounds, Direction};
use crate::core::history::ViewHistory;
use crate::core::registry::{FocusDescriptor, FocusRegistry};
use crate::core::signal::{NavOutcome, Signal};

/// Default weight applied to perpendicular misalignment. At 2.0 a neighbour
/// in the same row beats a diagonal one unless the diagonal is more than
/// twice its offset closer along the direction of travel.
pub const DEFAULT_ALIGNMENT_WEIGHT: f64 = 2.0;

/// Scoring constants. Deterministic for a given value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavTuning {
    pub alignment_weight: f64,
    /// Search the current section before the whole registry.
    pub section_first: bool,
}

impl Default for NavTuning {
    fn default() -> Self {
        Self {
            alignment_weight: DEFAULT_ALIGNMENT_WEIGHT,
            section_first: true,
        }
    }
}

/// Per-root configuration accepted when the engine is attached.
pub struct RootConfig {
    pub enabled: bool,
    /// Gets first refusal on Back. Returns true when it consumed the signal.
    pub on_back: Option<Box<dyn FnMut() -> bool>>,
    pub initial_focus_id: Option<String>,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            on_back: None,
            initial_focus_id: None,
        }
    }
}

impl RootConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_initial_focus(mut self, id: impl Into<String>) -> Self {
        self.initial_focus_id = Some(id.into());
        self
    }

    pub fn with_back_handler(mut self, handler: impl FnMut() -> bool + 'static) -> Self {
        self.on_back = Some(Box::new(handler));
        self
    }
}

impl fmt::Debug for RootConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootConfig")
            .field("enabled", &self.enabled)
            .field("has_on_back", &self.on_back.is_some())
            .field("initial_focus_id", &self.initial_focus_id)
            .finish()
    }
}

/// A ranked navigation candidate.
struct Scored {
    id: String,
    /// `None` unless both sides carry a hint on the relevant axis.
    hint_delta: Option<u32>,
    score: f64,
    order: usize,
}

impl Scored {
    fn rank(&self, other: &Scored) -> Ordering {
        self.hint_delta
            .cmp(&other.hint_delta)
            .then_with(|| self.geometric_rank(other))
    }

    fn geometric_rank(&self, other: &Scored) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then(self.order.cmp(&other.order))
    }
}

/// The navigation engine for one root: registry, history and config.
pub struct SpatialNavigator {
    registry: FocusRegistry,
    history: ViewHistory,
    config: RootConfig,
    tuning: NavTuning,
}

impl SpatialNavigator {
    pub fn new(registry: FocusRegistry, history: ViewHistory, config: RootConfig) -> Self {
        Self {
            registry,
            history,
            config,
            tuning: NavTuning::default(),
        }
    }

    pub fn with_tuning(mut self, tuning: NavTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn registry(&self) -> &FocusRegistry {
        &self.registry
    }

    pub fn history(&self) -> &ViewHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ViewHistory {
        &mut self.history
    }

    pub fn tuning(&self) -> NavTuning {
        self.tuning
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    pub fn set_initial_focus(&mut self, id: Option<String>) {
        self.config.initial_focus_id = id;
    }

    /// Apply `initial_focus_id` if it resolves to a live, enabled descriptor.
    /// Otherwise focus is left to the registry's auto-focus policy.
    pub fn mount(&mut self) -> Option<String> {
        if let Some(id) = self.config.initial_focus_id.as_deref() {
            if self.registry.set_focus(id) {
                debug!("Mounted with initial focus '{}'", id);
            } else {
                debug!("Initial focus '{}' not available at mount", id);
            }
        }
        self.registry.current()
    }

    pub fn handle(&mut self, signal: Signal) -> NavOutcome {
        self.handle_at(signal, Instant::now())
    }

    /// Handle one signal. `now` is only consulted for Back.
    pub fn handle_at(&mut self, signal: Signal, now: Instant) -> NavOutcome {
        if !self.config.enabled {
            trace!("Root disabled, ignoring {:?}", signal);
            return NavOutcome::Ignored;
        }
        match signal {
            Signal::Up | Signal::Down | Signal::Left | Signal::Right => {
                let Some(direction) = signal.direction() else {
                    return NavOutcome::Stayed;
                };
                match self.navigate(direction) {
                    Some(id) => NavOutcome::Moved(id),
                    None => NavOutcome::Stayed,
                }
            }
            Signal::Activate => self.activate(),
            Signal::Back => self.back_at(now),
        }
    }

    /// Move focus one step in `direction`. Returns the newly focused id, or
    /// `None` when focus did not move.
    pub fn navigate(&mut self, direction: Direction) -> Option<String> {
        let current = self
            .registry
            .current()
            .and_then(|id| self.registry.get(&id));
        let Some(current) = current else {
            return self.focus_fallback();
        };

        let from = current.current_bounds();
        let section = current.section.as_deref().filter(|_| self.tuning.section_first);

        let target = section
            .and_then(|s| self.best_candidate(&current, &from, direction, Some(s)))
            .or_else(|| self.best_candidate(&current, &from, direction, None));

        let Some(target) = target else {
            trace!("No candidate {:?} of '{}'", direction, current.id);
            return None;
        };
        debug!("Navigate {:?}: '{}' -> '{}'", direction, current.id, target);
        self.registry.set_focus(&target).then_some(target)
    }

    /// With nothing focused: the configured initial id, else the first live
    /// descriptor in registration order.
    fn focus_fallback(&mut self) -> Option<String> {
        if let Some(id) = self.config.initial_focus_id.as_deref()
            && self.registry.set_focus(id)
        {
            debug!("No focus, restored initial focus '{}'", id);
            return Some(id.to_string());
        }
        let first = self.registry.candidates(None).into_iter().next()?;
        debug!("No focus, focusing first descriptor '{}'", first.id);
        self.registry.set_focus(&first.id).then_some(first.id)
    }

    fn best_candidate(
        &self,
        current: &FocusDescriptor,
        from: &Bounds,
        direction: Direction,
        section: Option<&str>,
    ) -> Option<String> {
        let (hinted, plain): (Vec<Scored>, Vec<Scored>) = self
            .registry
            .candidates(section)
            .into_iter()
            .enumerate()
            .filter(|(_, d)| d.id != current.id)
            .filter_map(|(order, d)| {
                let bounds = d.current_bounds();
                if bounds.is_empty() || !direction.admits(from, &bounds) {
                    return None;
                }
                let score = direction.primary_gap(from, &bounds)
                    + self.tuning.alignment_weight * direction.secondary_offset(from, &bounds);
                Some(Scored {
                    hint_delta: hint_delta(current, &d, direction),
                    id: d.id,
                    score,
                    order,
                })
            })
            .partition(|s| s.hint_delta.is_some());

        let best_hinted = hinted.into_iter().min_by(Scored::rank);
        let best_plain = plain.into_iter().min_by(Scored::geometric_rank);
        let winner = match (best_hinted, best_plain) {
            (Some(h), Some(p)) => match h.geometric_rank(&p) {
                Ordering::Greater => p,
                _ => h,
            },
            (h, p) => h.or(p)?,
        };
        Some(winner.id)
    }

    /// Run the focused descriptor's activation callback.
    pub fn activate(&mut self) -> NavOutcome {
        let Some(id) = self.registry.current() else {
            return NavOutcome::NothingToActivate;
        };
        let Some(callback) = self.registry.get(&id).and_then(|d| d.on_activate) else {
            trace!("'{}' has no activation callback", id);
            return NavOutcome::NothingToActivate;
        };
        debug!("Activate '{}'", id);
        // Registry is not borrowed here, so the callback may move focus.
        callback();
        NavOutcome::Activated(id)
    }

    /// Offer Back to the root's handler, then to the view history.
    pub fn back_at(&mut self, now: Instant) -> NavOutcome {
        if let Some(handler) = self.config.on_back.as_mut()
            && handler()
        {
            debug!("Back consumed by root handler");
            return NavOutcome::BackHandled;
        }
        NavOutcome::History(self.history.go_back_at(now))
    }

    /// Drive the exit-confirmation timer. Returns true when it fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.history.tick(now)
    }

    /// Cancel pending timers and drop focus. Called when the root goes away.
    pub fn teardown(&mut self) {
        debug!("Tearing down navigation root");
        self.history.cancel_exit_timer();
        self.registry.clear_focus();
    }
}

/// Grid-hint distance on the axis perpendicular to travel, when both
/// descriptors carry a hint on that axis.
fn hint_delta(
    from: &FocusDescriptor,
    candidate: &FocusDescriptor,
    direction: Direction,
) -> Option<u32> {
    let (a, b) = if direction.is_horizontal() {
        (from.row, candidate.row)
    } else {
        (from.col, candidate.col)
    };
    Some(a?.abs_diff(b?))
}

impl fmt::Debug for SpatialNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialNavigator")
            .field("registry", &self.registry)
            .field("history", &self.history)
            .field("config", &self.config)
            .field("tuning", &self.tuning)
            .finish()
    }
}
