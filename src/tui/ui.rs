use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{DetailOverlay, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

const HELP_TEXT: &str =
    " ←↑↓→/hjkl Move  Enter/Space OK  Esc/Backspace Back  f Forward  r Reset  Ctrl+C Quit ";

pub fn draw_ui(frame: &mut Frame, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, help_area] = layout.areas(frame.area());

    let history = tui.nav.history();
    let mut title_bar = TitleBar::new(
        history.current().to_string(),
        history.depth(),
        tui.status_message.clone(),
        history.is_exit_armed(),
    );
    title_bar.render(frame, title_area);

    tui.screen.render(frame, main_area);

    frame.render_widget(
        Span::styled(HELP_TEXT, Style::default().add_modifier(Modifier::DIM)),
        help_area,
    );

    if let Some(title) = tui.detail() {
        DetailOverlay::new(title).render(frame, main_area);
    }

    tui.mark_laid_out();
}
