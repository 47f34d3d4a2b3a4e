//! # Focus Registry
//!
//! The ledger of focusable elements for one navigation root, and the owner
//! of the single "current focus" id.
//!
//! ```text
//! FocusRegistry (Rc handle, one per root)
//! ├── entries: Vec<Entry>        // registration order, replace-in-place
//! ├── current: Option<String>    // None or a live, enabled id
//! ├── auto_focus: AutoFocus      // register-time focus policy
//! └── listeners                  // notified after every focus change
//! ```
//!
//! Every mutation that could leave `current` pointing at a removed or
//! disabled descriptor clears it in the same borrow, so the invariant holds
//! structurally. Listeners always run with no borrow held, which is what
//! lets a listener (or an activation callback) call back into the registry.

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::geometry::Bounds;

/// Supplies an element's current on-screen rectangle.
///
/// Queried at navigation time on every key press; implementations must
/// return live geometry rather than a value captured at registration.
pub trait BoundsProvider {
    fn bounds(&self) -> Bounds;
}

impl<F> BoundsProvider for F
where
    F: Fn() -> Bounds,
{
    fn bounds(&self) -> Bounds {
        self()
    }
}

/// The registry's record of one focusable element.
#[derive(Clone)]
pub struct FocusDescriptor {
    pub id: String,
    pub section: Option<String>,
    pub row: Option<i32>,
    pub col: Option<i32>,
    pub bounds: Rc<dyn BoundsProvider>,
    pub disabled: bool,
    pub on_activate: Option<Rc<dyn Fn()>>,
}

impl FocusDescriptor {
    pub fn new(id: impl Into<String>, bounds: impl BoundsProvider + 'static) -> Self {
        Self {
            id: id.into(),
            section: None,
            row: None,
            col: None,
            bounds: Rc::new(bounds),
            disabled: false,
            on_activate: None,
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_grid(mut self, row: i32, col: i32) -> Self {
        self.row = Some(row);
        self.col = Some(col);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_activate(mut self, on_activate: impl Fn() + 'static) -> Self {
        self.on_activate = Some(Rc::new(on_activate));
        self
    }

    /// Current rectangle, queried from the provider.
    pub fn current_bounds(&self) -> Bounds {
        self.bounds.bounds()
    }
}

impl fmt::Debug for FocusDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusDescriptor")
            .field("id", &self.id)
            .field("section", &self.section)
            .field("row", &self.row)
            .field("col", &self.col)
            .field("disabled", &self.disabled)
            .field("has_activate", &self.on_activate.is_some())
            .finish()
    }
}

/// What `register` does when nothing has focus yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoFocus {
    /// The first enabled descriptor registered into a registry that has never
    /// held focus receives it.
    #[default]
    FirstRegistration,
    /// Registration never moves focus.
    Disabled,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(Option<&str>)>;

struct Entry {
    descriptor: FocusDescriptor,
    generation: u64,
}

struct RegistryInner {
    entries: Vec<Entry>,
    current: Option<String>,
    ever_focused: bool,
    auto_focus: AutoFocus,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_generation: u64,
    next_subscription: u64,
}

impl RegistryInner {
    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.descriptor.id == id)
    }
}

/// Shared handle to one root's registry. Cloning is cheap and every clone
/// sees the same state.
#[derive(Clone)]
pub struct FocusRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

/// Non-owning registry reference held by focus handles.
#[derive(Clone)]
pub struct WeakRegistry {
    inner: Weak<RefCell<RegistryInner>>,
}

impl WeakRegistry {
    pub fn upgrade(&self) -> Option<FocusRegistry> {
        self.inner.upgrade().map(|inner| FocusRegistry { inner })
    }
}

impl Default for FocusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusRegistry {
    pub fn new() -> Self {
        Self::with_auto_focus(AutoFocus::default())
    }

    pub fn with_auto_focus(auto_focus: AutoFocus) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryInner {
                entries: Vec::new(),
                current: None,
                ever_focused: false,
                auto_focus,
                listeners: Vec::new(),
                next_generation: 0,
                next_subscription: 0,
            })),
        }
    }

    pub fn downgrade(&self) -> WeakRegistry {
        WeakRegistry {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn auto_focus(&self) -> AutoFocus {
        self.inner.borrow().auto_focus
    }

    pub fn set_auto_focus(&self, policy: AutoFocus) {
        self.inner.borrow_mut().auto_focus = policy;
    }

    /// Insert or replace a descriptor by id (last write wins).
    pub fn register(&self, descriptor: FocusDescriptor) {
        self.register_tracked(descriptor);
    }

    /// Like `register`, but returns the generation stamped on the entry so a
    /// binding can later remove only its own registration.
    pub(crate) fn register_tracked(&self, descriptor: FocusDescriptor) -> u64 {
        let (generation, focus_changed) = {
            let mut inner = self.inner.borrow_mut();
            let generation = inner.next_generation;
            inner.next_generation += 1;

            let id = descriptor.id.clone();
            let disabled = descriptor.disabled;
            let entry = Entry {
                descriptor,
                generation,
            };

            let mut focus_changed = false;
            match inner.position(&id) {
                Some(idx) => {
                    debug!("Replacing focus descriptor '{}'", id);
                    inner.entries[idx] = entry;
                    if disabled && inner.current.as_deref() == Some(id.as_str()) {
                        debug!("Focused descriptor '{}' replaced as disabled, clearing focus", id);
                        inner.current = None;
                        focus_changed = true;
                    }
                }
                None => {
                    trace!("Registering focus descriptor '{}'", id);
                    inner.entries.push(entry);
                }
            }

            if inner.auto_focus == AutoFocus::FirstRegistration
                && inner.current.is_none()
                && !inner.ever_focused
                && !disabled
            {
                debug!("Auto-focusing first registration '{}'", id);
                inner.current = Some(id);
                inner.ever_focused = true;
                focus_changed = true;
            }

            (generation, focus_changed)
        };

        if focus_changed {
            self.notify();
        }
        generation
    }

    /// Remove a descriptor. Removing the focused one leaves focus empty.
    pub fn unregister(&self, id: &str) {
        self.remove_where(id, None);
    }

    /// Remove `id` only if it still carries `generation`; a newer registration
    /// of the same id is left alone.
    pub(crate) fn unregister_generation(&self, id: &str, generation: u64) {
        self.remove_where(id, Some(generation));
    }

    fn remove_where(&self, id: &str, generation: Option<u64>) {
        let focus_changed = {
            let mut inner = self.inner.borrow_mut();
            let Some(idx) = inner.position(id) else {
                trace!("Unregister of unknown id '{}' ignored", id);
                return;
            };
            if let Some(expected) = generation
                && inner.entries[idx].generation != expected
            {
                trace!("Stale unregister of '{}' ignored (re-registered since)", id);
                return;
            }
            inner.entries.remove(idx);
            trace!("Unregistered focus descriptor '{}'", id);

            if inner.current.as_deref() == Some(id) {
                debug!("Focused descriptor '{}' removed, focus is now empty", id);
                inner.current = None;
                true
            } else {
                false
            }
        };

        if focus_changed {
            self.notify();
        }
    }

    /// Focus `id` if it names a live, enabled descriptor. Anything else is a
    /// silent no-op and returns `false`.
    pub fn set_focus(&self, id: &str) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            let eligible = inner
                .position(id)
                .is_some_and(|idx| !inner.entries[idx].descriptor.disabled);
            if !eligible {
                trace!("set_focus('{}') ignored: unknown or disabled", id);
                return false;
            }
            if inner.current.as_deref() == Some(id) {
                return true;
            }
            debug!("Focus: {:?} -> '{}'", inner.current, id);
            inner.current = Some(id.to_string());
            inner.ever_focused = true;
        }
        self.notify();
        true
    }

    pub fn clear_focus(&self) {
        let had_focus = self.inner.borrow_mut().current.take().is_some();
        if had_focus {
            debug!("Focus cleared");
            self.notify();
        }
    }

    pub fn current(&self) -> Option<String> {
        self.inner.borrow().current.clone()
    }

    pub fn is_focused(&self, id: &str) -> bool {
        self.inner.borrow().current.as_deref() == Some(id)
    }

    pub fn get(&self, id: &str) -> Option<FocusDescriptor> {
        let inner = self.inner.borrow();
        inner
            .position(id)
            .map(|idx| inner.entries[idx].descriptor.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.borrow().position(id).is_some()
    }

    /// Generation stamped on the live registration of `id`.
    pub(crate) fn generation(&self, id: &str) -> Option<u64> {
        let inner = self.inner.borrow();
        inner.position(id).map(|idx| inner.entries[idx].generation)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// All registered ids in registration order, disabled ones included.
    pub fn ids(&self) -> Vec<String> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|e| e.descriptor.id.clone())
            .collect()
    }

    /// Live, enabled descriptors in registration order, optionally limited
    /// to one section.
    pub fn candidates(&self, section: Option<&str>) -> Vec<FocusDescriptor> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|e| &e.descriptor)
            .filter(|d| !d.disabled)
            .filter(|d| section.is_none_or(|s| d.section.as_deref() == Some(s)))
            .cloned()
            .collect()
    }

    /// Register a listener for focus changes. It receives the new current id
    /// after every change.
    pub fn subscribe(&self, listener: impl Fn(Option<&str>) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.listeners.push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.borrow_mut().listeners.retain(|(sid, _)| *sid != id);
    }

    fn notify(&self) {
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            // Re-read per listener: an earlier listener may have moved focus.
            let current = self.current();
            listener(current.as_deref());
        }
    }
}

impl fmt::Debug for FocusRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FocusRegistry")
            .field("ids", &inner.entries.iter().map(|e| &e.descriptor.id).collect::<Vec<_>>())
            .field("current", &inner.current)
            .field("auto_focus", &inner.auto_focus)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}
