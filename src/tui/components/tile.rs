//! # Tile Component
//!
//! One focusable box on screen. A tile owns its `FocusableBinding`, so
//! dropping the tile unregisters it from the navigation root.
//!
//! ## Geometry
//!
//! The navigator needs live bounds, but only the renderer knows where a tile
//! ends up. Each tile shares an `Rc<Cell<Bounds>>` with its descriptor:
//! `render()` writes the rectangle it was given, the descriptor's bounds
//! provider reads it back on the next key press. A tile that has never been
//! drawn reports empty bounds and is skipped by directional search.
//!
//! ## Presentation
//!
//! - Focused: thick yellow border (the focus ring)
//! - Disabled: dark gray, dimmed
//! - Otherwise: rounded border in the default style

use std::cell::Cell;
use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::binding::{BindingSpec, FocusableBinding};
use crate::core::geometry::Bounds;
use crate::core::registry::FocusRegistry;
use crate::tui::component::Component;

pub struct Tile {
    pub label: String,
    binding: FocusableBinding,
    area: Rc<Cell<Bounds>>,
}

impl Tile {
    /// Attach a tile to `registry`. `configure` adds section, grid hints,
    /// callbacks and so on to the binding before it is registered.
    pub fn attach(
        registry: &FocusRegistry,
        id: &str,
        label: impl Into<String>,
        configure: impl FnOnce(BindingSpec) -> BindingSpec,
    ) -> Self {
        let area = Rc::new(Cell::new(Bounds::default()));
        let reader = Rc::clone(&area);
        let spec = configure(BindingSpec::new(id, move || reader.get()));
        Self {
            label: label.into(),
            binding: FocusableBinding::attach(registry, spec),
            area,
        }
    }

    pub fn id(&self) -> &str {
        self.binding.id()
    }

    pub fn binding(&self) -> &FocusableBinding {
        &self.binding
    }

    /// Last rendered rectangle, in terminal cells.
    pub fn bounds(&self) -> Bounds {
        self.area.get()
    }

    /// Whether the terminal cell at (`col`, `row`) lies inside this tile.
    pub fn contains(&self, col: u16, row: u16) -> bool {
        let b = self.area.get();
        let (col, row) = (col as i64, row as i64);
        !b.is_empty() && col >= b.left() && col < b.right() && row >= b.top() && row < b.bottom()
    }

    fn style(&self) -> (Style, BorderType) {
        if self.binding.is_disabled() {
            (
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
                BorderType::Rounded,
            )
        } else if self.binding.is_focused() {
            (
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                BorderType::Thick,
            )
        } else {
            (Style::default(), BorderType::Rounded)
        }
    }
}

impl Component for Tile {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.area.set(Bounds::new(
            area.x as i32,
            area.y as i32,
            area.width as i32,
            area.height as i32,
        ));

        let (style, border_type) = self.style();
        let inner_width = area.width.saturating_sub(2) as usize;
        let paragraph = Paragraph::new(fit_label(&self.label, inner_width))
            .alignment(Alignment::Center)
            .style(style)
            .block(
                Block::bordered()
                    .border_type(border_type)
                    .border_style(style),
            );
        frame.render_widget(paragraph, area);
    }
}

/// Truncate `label` to `width` display columns, marking the cut with "…".
pub fn fit_label(label: &str, width: usize) -> String {
    if label.width() <= width {
        return label.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::AutoFocus;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(tile: &mut Tile, area: Rect) -> String {
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| tile.render(f, area)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_render_records_bounds() {
        let reg = FocusRegistry::with_auto_focus(AutoFocus::Disabled);
        let mut tile = Tile::attach(&reg, "a", "Alpha", |s| s);
        assert!(tile.bounds().is_empty());

        draw(&mut tile, Rect::new(2, 3, 12, 3));
        assert_eq!(tile.bounds(), Bounds::new(2, 3, 12, 3));
        assert_eq!(reg.get("a").unwrap().current_bounds(), Bounds::new(2, 3, 12, 3));
    }

    #[test]
    fn test_focused_tile_draws_thick_ring() {
        let reg = FocusRegistry::with_auto_focus(AutoFocus::Disabled);
        let mut tile = Tile::attach(&reg, "a", "Alpha", |s| s);

        let text = draw(&mut tile, Rect::new(0, 0, 12, 3));
        assert!(text.contains('╭'));
        assert!(!text.contains('┏'));

        reg.set_focus("a");
        let text = draw(&mut tile, Rect::new(0, 0, 12, 3));
        assert!(text.contains('┏'));
        assert!(text.contains("Alpha"));
    }

    #[test]
    fn test_disabled_tile_is_muted() {
        let reg = FocusRegistry::new();
        let mut tile = Tile::attach(&reg, "off", "Off", |s| s.with_disabled(true));
        assert!(!tile.binding().focus());

        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal
            .draw(|f| tile.render(f, Rect::new(0, 0, 12, 3)))
            .unwrap();
        let buffer = terminal.backend().buffer();

        let corner = &buffer[(0, 0)];
        assert_eq!(corner.symbol(), "╭");
        assert_eq!(corner.fg, Color::DarkGray);
        assert!(corner.modifier.contains(Modifier::DIM));

        let label = buffer.content().iter().find(|c| c.symbol() == "O").unwrap();
        assert_eq!(label.fg, Color::DarkGray);
        assert!(!buffer.content().iter().any(|c| c.symbol() == "┏"));
    }

    #[test]
    fn test_contains() {
        let reg = FocusRegistry::with_auto_focus(AutoFocus::Disabled);
        let mut tile = Tile::attach(&reg, "a", "Alpha", |s| s);
        assert!(!tile.contains(0, 0));

        draw(&mut tile, Rect::new(5, 2, 10, 3));
        assert!(tile.contains(5, 2));
        assert!(tile.contains(14, 4));
        assert!(!tile.contains(15, 4));
        assert!(!tile.contains(5, 5));
    }

    #[test]
    fn test_drop_unregisters() {
        let reg = FocusRegistry::new();
        let tile = Tile::attach(&reg, "a", "Alpha", |s| s.with_section("grid"));
        assert!(reg.contains("a"));
        drop(tile);
        assert!(!reg.contains("a"));
    }

    #[test]
    fn test_fit_label() {
        assert_eq!(fit_label("Dune", 10), "Dune");
        assert_eq!(fit_label("Interstellar", 6), "Inter…");
        assert_eq!(fit_label("Interstellar", 0), "");
        // Wide glyphs count as two columns
        assert_eq!(fit_label("日本語", 4), "日…");
    }
}
