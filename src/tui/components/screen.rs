//! # Screen Component
//!
//! A full view: a sidebar section on the left and a content grid on the
//! right. Every box is a `Tile`, so building a screen registers its tiles
//! with the navigation root and dropping it unregisters them.
//!
//! ```text
//! ┌──────────┐ Movies
//! │ Home     │ ┌────────┐ ┌────────┐ ┌────────┐
//! ├──────────┤ │ Dune   │ │ Heat   │ │ Alien  │
//! │ Movies   │ └────────┘ └────────┘ └────────┘
//! ├──────────┤ ┌────────┐ ┌────────┐
//! │ Settings │ │ Tenet  │ │ 4K ... │
//! └──────────┘ └────────┘ └────────┘
//! ```
//!
//! Sidebar tiles carry `row = i, col = 0`; grid tiles carry
//! `row = r, col = c + 1`, so grid hints line up across both sections.
//!
//! Activation never touches the view history directly. Tiles push a
//! `ScreenCommand` onto a shared queue and the event loop applies it once
//! the navigator has returned.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::core::registry::FocusRegistry;
use crate::tui::component::Component;
use crate::tui::components::tile::Tile;

pub const SIDEBAR_SECTION: &str = "sidebar";
pub const GRID_SECTION: &str = "grid";

const SIDEBAR_WIDTH: u16 = 16;
const SIDEBAR_TILE_HEIGHT: u16 = 3;
const GRID_TILE_HEIGHT: u16 = 5;

/// Something a tile asked the host to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenCommand {
    /// Push a view onto the history.
    Open(String),
    /// Show the detail overlay for an item.
    ShowDetail(String),
}

pub type CommandQueue = Rc<RefCell<VecDeque<ScreenCommand>>>;

/// (view, sidebar label)
const MENU: &[(&str, &str)] = &[
    ("home", "Home"),
    ("movies", "Movies"),
    ("shows", "Shows"),
    ("settings", "Settings"),
];

/// A grid entry: label and whether it can be focused.
type Item = (&'static str, bool);

fn catalog(view: &str) -> Option<(&'static str, Vec<Vec<Item>>)> {
    let rows: Vec<Vec<Item>> = match view {
        "home" => vec![
            vec![("Dune", true), ("Arrival", true), ("Blade Runner 2049", true)],
            vec![("Heat", true), ("Alien", true), ("Sicario", true)],
        ],
        "movies" => vec![
            vec![("Dune", true), ("Interstellar", true), ("Arrival", true), ("Tenet", true)],
            vec![("Alien", true), ("Heat", true), ("4K Remaster", false), ("Sicario", true)],
        ],
        "shows" => vec![
            vec![("Severance", true), ("Dark", true), ("Andor", true)],
            vec![("Succession", true), ("Fargo", true)],
        ],
        "settings" => vec![
            vec![("Display", true), ("Audio", true), ("Network", true)],
            vec![("About", true)],
        ],
        _ => return None,
    };
    let heading = match view {
        "home" => "Continue watching",
        "movies" => "Movies",
        "shows" => "Shows",
        _ => "Settings",
    };
    Some((heading, rows))
}

pub struct Screen {
    pub view: String,
    heading: String,
    sidebar: Vec<Tile>,
    rows: Vec<Vec<Tile>>,
}

impl Screen {
    /// Build and register every tile for `view`. Unknown views get a
    /// placeholder with a single "Go home" tile.
    pub fn build(view: &str, registry: &FocusRegistry, commands: &CommandQueue) -> Self {
        let sidebar = MENU
            .iter()
            .enumerate()
            .map(|(i, (target, label))| {
                let id = format!("nav-{target}");
                let target = target.to_string();
                let queue = Rc::clone(commands);
                Tile::attach(registry, &id, *label, |spec| {
                    spec.with_section(SIDEBAR_SECTION)
                        .with_grid(i as i32, 0)
                        .on_click(move || {
                            queue
                                .borrow_mut()
                                .push_back(ScreenCommand::Open(target.clone()))
                        })
                })
            })
            .collect();

        let (heading, items) = match catalog(view) {
            Some((heading, items)) => (heading.to_string(), items),
            None => (format!("'{view}' is empty"), vec![vec![("Go home", true)]]),
        };
        let known = catalog(view).is_some();

        let rows = items
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, (label, enabled))| {
                        let id = format!("{view}-{r}-{c}");
                        let command = if known {
                            ScreenCommand::ShowDetail(label.to_string())
                        } else {
                            ScreenCommand::Open("home".to_string())
                        };
                        let queue = Rc::clone(commands);
                        Tile::attach(registry, &id, *label, |spec| {
                            spec.with_section(GRID_SECTION)
                                .with_grid(r as i32, c as i32 + 1)
                                .with_disabled(!enabled)
                                .on_click(move || queue.borrow_mut().push_back(command.clone()))
                        })
                    })
                    .collect()
            })
            .collect();

        log::debug!("Built screen '{}'", view);
        Self {
            view: view.to_string(),
            heading,
            sidebar,
            rows,
        }
    }

    /// Where focus should land when this screen is first shown.
    pub fn initial_focus(&self) -> Option<String> {
        self.rows
            .iter()
            .flatten()
            .find(|t| !t.binding().is_disabled())
            .map(|t| t.id().to_string())
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.sidebar.iter().chain(self.rows.iter().flatten())
    }

    pub fn hit_test(&self, col: u16, row: u16) -> Option<&Tile> {
        self.tiles().find(|t| t.contains(col, row))
    }
}

impl Component for Screen {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        use Constraint::{Length, Min};
        let [sidebar_area, _, content_area] =
            Layout::horizontal([Length(SIDEBAR_WIDTH), Length(1), Min(0)]).areas(area);

        let sidebar_rows =
            Layout::vertical(vec![Length(SIDEBAR_TILE_HEIGHT); self.sidebar.len()])
                .split(sidebar_area);
        for (tile, rect) in self.sidebar.iter_mut().zip(sidebar_rows.iter()) {
            tile.render(frame, *rect);
        }

        let [heading_area, grid_area] = Layout::vertical([Length(1), Min(0)]).areas(content_area);
        frame.render_widget(
            Span::styled(
                self.heading.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            heading_area,
        );

        // Same column widths on every row, so short rows stay aligned
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(1).max(1) as u32;
        let row_areas =
            Layout::vertical(vec![Length(GRID_TILE_HEIGHT); self.rows.len()]).split(grid_area);
        for (row, row_area) in self.rows.iter_mut().zip(row_areas.iter()) {
            let cells = Layout::horizontal(vec![Constraint::Ratio(1, columns); columns as usize])
                .spacing(1)
                .split(*row_area);
            for (tile, rect) in row.iter_mut().zip(cells.iter()) {
                tile.render(frame, *rect);
            }
        }
    }
}
