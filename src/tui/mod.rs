//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders screens of
//! focusable tiles, and translates keyboard events into remote `Signal`s.
//!
//! This is the only module that knows about ratatui and crossterm. A TV
//! shell would replace it and keep `core` as is.
//!
//! ## Wiring
//!
//! - One `FocusRegistry` + `SpatialNavigator` for the whole terminal.
//! - One `Screen` at a time. Changing view drops the old screen (its tiles
//!   unregister) and builds the new one.
//! - Tiles never touch history themselves. They queue a `ScreenCommand`;
//!   the loop applies queued commands after the navigator returns.
//! - The exit capability sets a quit flag the loop checks every iteration.
//! - A freshly built screen has no geometry until it is drawn. Input that
//!   arrives in between is deferred and replayed right after the next draw,
//!   so a fast "Enter, Right" lands on the new screen.
//!
//! ## Redraw Strategy
//!
//! Redraw only after an event or a timer firing. While the exit timer is
//! armed the loop polls every 100ms so the hint disappears on time;
//! otherwise it sleeps up to 500ms.

pub mod component;
pub mod components;
pub mod event;
mod ui;

use log::{debug, info};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::io::stdout;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use crate::core::config::ResolvedConfig;
use crate::core::engine::{RootConfig, SpatialNavigator};
use crate::core::history::{BackOutcome, ViewHistory};
use crate::core::registry::FocusRegistry;
use crate::core::signal::{NavOutcome, Signal};
use crate::tui::components::{CommandQueue, Screen, ScreenCommand};
use crate::tui::event::{TuiEvent, poll_event_timeout};

const ARMED_POLL: Duration = Duration::from_millis(100);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI presentation state plus the navigation root it drives.
pub struct TuiState {
    pub nav: SpatialNavigator,
    pub screen: Screen,
    pub status_message: String,
    /// Title of the open detail popup, if any. Shared with the root's back
    /// handler, which closes it.
    detail: Rc<RefCell<Option<String>>>,
    commands: CommandQueue,
    /// Last focused tile per view, restored when the view is shown again.
    remembered: HashMap<String, String>,
    quit: Rc<Cell<bool>>,
    /// Set when the screen was rebuilt and not drawn since.
    layout_stale: bool,
    deferred: VecDeque<TuiEvent>,
}

impl TuiState {
    pub fn new(config: &ResolvedConfig) -> Self {
        let registry = FocusRegistry::with_auto_focus(config.auto_focus);
        let quit = Rc::new(Cell::new(false));
        let detail: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));

        let history = ViewHistory::new(config.root_view.clone())
            .with_exit_window(config.exit_window)
            .on_exit({
                let quit = Rc::clone(&quit);
                move || quit.set(true)
            });
        let root = RootConfig::new().with_back_handler({
            let detail = Rc::clone(&detail);
            move || detail.borrow_mut().take().is_some()
        });
        let nav = SpatialNavigator::new(registry.clone(), history, root).with_tuning(config.tuning);

        let commands = CommandQueue::default();
        // Startup focus is left to the registry's auto-focus policy
        let screen = Screen::build(&config.root_view, &registry, &commands);

        Self {
            nav,
            screen,
            status_message: String::new(),
            detail,
            commands,
            remembered: HashMap::new(),
            quit,
            layout_stale: true,
            deferred: VecDeque::new(),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit.get()
    }

    pub fn detail(&self) -> Option<String> {
        self.detail.borrow().clone()
    }

    pub fn handle_event(&mut self, event: TuiEvent, now: Instant) {
        if self.layout_stale && !matches!(event, TuiEvent::ForceQuit | TuiEvent::Resize) {
            debug!("Screen not laid out yet, deferring {:?}", event);
            self.deferred.push_back(event);
            return;
        }
        match event {
            TuiEvent::Resize => {}
            TuiEvent::ForceQuit => self.quit.set(true),
            TuiEvent::Signal(signal) => {
                // The popup is modal: only Back reaches the navigator
                if self.detail.borrow().is_some() && signal != Signal::Back {
                    return;
                }
                let outcome = self.nav.handle_at(signal, now);
                self.apply_outcome(outcome);
            }
            TuiEvent::Forward => {
                if let Some(view) = self.nav.history_mut().go_forward() {
                    self.show_view(&view);
                }
            }
            TuiEvent::ResetNavigation => {
                self.nav.history_mut().reset_navigation();
                let root = self.nav.history().root().to_string();
                self.status_message.clear();
                self.show_view(&root);
            }
            TuiEvent::MouseClick(col, row) => {
                if self.detail.borrow().is_none()
                    && let Some(tile) = self.screen.hit_test(col, row)
                {
                    tile.binding().activate();
                }
            }
        }
        self.apply_commands();
    }

    /// Called by the renderer once every tile has its geometry.
    fn mark_laid_out(&mut self) {
        self.layout_stale = false;
    }

    /// Replay input deferred while the screen was being rebuilt. Returns
    /// true if anything was replayed.
    pub fn replay_deferred(&mut self, now: Instant) -> bool {
        if self.layout_stale || self.deferred.is_empty() {
            return false;
        }
        let queued = std::mem::take(&mut self.deferred);
        debug!("Replaying {} deferred event(s)", queued.len());
        for event in queued {
            // Re-defers the rest if this one rebuilds the screen again
            self.handle_event(event, now);
        }
        true
    }

    /// Drive timers. Returns true when something visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.nav.tick(now)
    }

    fn apply_outcome(&mut self, outcome: NavOutcome) {
        debug!("Outcome: {:?}", outcome);
        match outcome {
            NavOutcome::BackHandled => self.status_message.clear(),
            NavOutcome::History(BackOutcome::Popped(view)) => self.show_view(&view),
            NavOutcome::History(BackOutcome::ExitRequested) => {
                info!("Exit requested from '{}'", self.nav.history().current());
            }
            _ => {}
        }
    }

    fn apply_commands(&mut self) {
        loop {
            let next = self.commands.borrow_mut().pop_front();
            let Some(command) = next else {
                break;
            };
            match command {
                ScreenCommand::Open(view) => {
                    if view == self.nav.history().current() {
                        continue;
                    }
                    self.nav.history_mut().navigate_to(view.clone());
                    self.show_view(&view);
                }
                ScreenCommand::ShowDetail(title) => {
                    self.status_message = format!("Playing: {title}");
                    *self.detail.borrow_mut() = Some(title);
                }
            }
        }
    }

    /// Replace the screen with `view` and put focus back where it was the
    /// last time that view was shown.
    fn show_view(&mut self, view: &str) {
        if let Some(id) = self.nav.registry().current() {
            self.remembered.insert(self.screen.view.clone(), id);
        }
        self.screen = Screen::build(view, self.nav.registry(), &self.commands);
        self.layout_stale = true;

        let target = self
            .remembered
            .get(view)
            .cloned()
            .or_else(|| self.screen.initial_focus());
        self.nav.set_initial_focus(target);
        let focused = self.nav.mount();
        debug!("Showing '{}', focus {:?}", view, focused);
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, Hide)?;
        info!("Terminal modes enabled (mouse, hidden cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, Show);
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut tui = TuiState::new(&config);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()?;
    let mut needs_redraw = true; // Force first frame

    let result = loop {
        if needs_redraw {
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &mut tui)) {
                break Err(e);
            }
            needs_redraw = false;
            if tui.replay_deferred(Instant::now()) {
                needs_redraw = true;
            }
        }
        if tui.should_quit() {
            break Ok(());
        }

        let timeout = if needs_redraw {
            Duration::ZERO
        } else if tui.nav.history().is_exit_armed() {
            ARMED_POLL
        } else {
            IDLE_POLL
        };

        // Process first event + drain ALL pending events before next draw
        let mut pending = match poll_event_timeout(timeout) {
            Ok(event) => event,
            Err(e) => break Err(e),
        };
        while let Some(event) = pending {
            tui.handle_event(event, Instant::now());
            needs_redraw = true;
            pending = match poll_event_timeout(Duration::ZERO) {
                Ok(event) => event,
                Err(e) => {
                    log::warn!("Dropping input after read error: {}", e);
                    None
                }
            };
        }

        if tui.tick(Instant::now()) {
            needs_redraw = true;
        }
        if tui.should_quit() {
            break Ok(());
        }
    };

    tui.nav.teardown();
    ratatui::restore();
    info!("dpad shutting down");
    result
}
