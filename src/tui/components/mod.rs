//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: current view, status, exit hint
//! - `DetailOverlay`: popup for an activated item
//!
//! ### Focusable Components
//!
//! - `Tile`: one focusable box; owns its `FocusableBinding`
//! - `Screen`: sidebar + content grid built from tiles
//!
//! ## Co-location of Concerns
//!
//! Each component file contains everything related to that component:
//! state, rendering, and tests.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── tile.rs          (Focusable box)
//! ├── screen.rs        (Sidebar + grid for one view)
//! └── detail.rs        (Modal popup)
//! ```

pub mod detail;
pub mod screen;
pub mod tile;
mod title_bar;

pub use detail::DetailOverlay;
pub use screen::{CommandQueue, Screen, ScreenCommand};
pub use tile::Tile;
pub use title_bar::TitleBar;
