//! # TitleBar Component
//!
//! Top status bar showing where the user is in the view history.
//!
//! ## Responsibilities
//!
//! - Display the current view and its history depth
//! - Display status messages (e.g., "Playing: Dune")
//! - Show the "Press Back again to exit" hint while the exit timer is armed
//!
//! ## Design Decisions
//!
//! ### Stateless Component
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar {
//!     view: "movies".to_string(),
//!     depth: 2,
//!     status_message: String::new(),
//!     exit_armed: false,
//! };
//! title_bar.render(frame, area);
//! ```
//!
//! ## Conditional Formatting
//!
//! 1. **Exit armed**: `"dpad | home | Press Back again to exit"`
//! 2. **Status message**: `"dpad | movies (2) | Playing: Dune"`
//! 3. **Default**: `"dpad | movies (2)"`
//!
//! The exit hint wins over any status message; it is the one thing the user
//! must not miss.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub const EXIT_HINT: &str = "Press Back again to exit";

/// Top status bar component.
pub struct TitleBar {
    /// Current view name (top of the history stack)
    pub view: String,
    /// Number of entries on the history stack
    pub depth: usize,
    /// Transient status (e.g., "Playing: Dune")
    pub status_message: String,
    /// Whether one more Back press will exit
    pub exit_armed: bool,
}

impl TitleBar {
    pub fn new(view: String, depth: usize, status_message: String, exit_armed: bool) -> Self {
        Self {
            view,
            depth,
            status_message,
            exit_armed,
        }
    }

    fn location(&self) -> String {
        if self.depth > 1 {
            format!("{} ({})", self.view, self.depth)
        } else {
            self.view.clone()
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("dpad", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" | "),
            Span::raw(self.location()),
        ];

        if self.exit_armed {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                EXIT_HINT,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        } else if !self.status_message.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::raw(self.status_message.as_str()));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
