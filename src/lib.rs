//! dpad: D-pad focus navigation for remote-controlled UIs.
//!
//! `core` is the engine; `tui` hosts it in a terminal.

pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;
