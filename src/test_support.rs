//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::Cell;
use std::rc::Rc;

use crate::core::geometry::Bounds;
use crate::core::registry::FocusDescriptor;

/// A descriptor with fixed geometry.
pub fn fixed(id: &str, x: i32, y: i32, w: i32, h: i32) -> FocusDescriptor {
    let bounds = Bounds::new(x, y, w, h);
    FocusDescriptor::new(id, move || bounds)
}

/// A descriptor whose geometry can be moved after registration.
pub fn movable(id: &str, initial: Bounds) -> (FocusDescriptor, Rc<Cell<Bounds>>) {
    let slot = Rc::new(Cell::new(initial));
    let reader = Rc::clone(&slot);
    (FocusDescriptor::new(id, move || reader.get()), slot)
}

/// Counts invocations of the exit capability.
#[derive(Clone, Default)]
pub struct ExitCounter {
    count: Rc<Cell<usize>>,
}

impl ExitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(&self) -> impl FnMut() + 'static {
        let count = Rc::clone(&self.count);
        move || count.set(count.get() + 1)
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }
}
