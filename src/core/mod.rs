//! # Core Navigation Logic
//!
//! The focus engine. It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • FocusRegistry        │
//!                    │  • SpatialNavigator     │
//!                    │  • ViewHistory          │
//!                    │  • FocusableBinding     │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Signal in, NavOutcome out
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  TV shell  │      │   Tests    │
//!     │  Adapter   │      │  (future)  │      │            │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`geometry`]: `Bounds` and `Direction`
//! - [`registry`]: the per-root ledger of focusable descriptors
//! - [`engine`]: nearest-neighbour navigation and signal dispatch
//! - [`history`]: screen-level back stack with double-back-to-exit
//! - [`binding`]: attaches one element to a registry
//! - [`signal`]: the input `Signal` and the `NavOutcome` it produces
//! - [`config`]: layered settings

pub mod binding;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod history;
pub mod registry;
pub mod signal;

// Re-export commonly used types for convenience
pub use binding::{BindingSpec, FocusHandle, FocusableBinding};
pub use engine::{NavTuning, RootConfig, SpatialNavigator};
pub use geometry::{Bounds, Direction};
pub use history::{BackOutcome, ViewHistory};
pub use registry::{AutoFocus, BoundsProvider, FocusDescriptor, FocusRegistry};
pub use signal::{NavOutcome, Signal};
