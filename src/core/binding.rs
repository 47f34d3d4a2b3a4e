//! # Focusable Binding
//!
//! Attaches one rendered element to a `FocusRegistry`.
//!
//! - `attach` registers the element's descriptor and subscribes to focus
//!   changes, so `is_focused()` tracks the registry live.
//! - Dropping the binding (or calling `detach`) unregisters it. Only this
//!   binding's own registration is removed; if the element was re-mounted
//!   under the same id in the meantime, the newer registration survives.
//! - `handle()` hands out a `FocusHandle`, the imperative "take focus"
//!   capability for this element.
//! - Activation focuses the element, then runs `on_select`, then `on_click`.

use log::trace;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::core::registry::{
    BoundsProvider, FocusDescriptor, FocusRegistry, SubscriptionId, WeakRegistry,
};

/// Everything a host supplies when attaching an element.
#[derive(Clone)]
pub struct BindingSpec {
    pub id: String,
    pub section: Option<String>,
    pub row: Option<i32>,
    pub col: Option<i32>,
    pub disabled: bool,
    pub bounds: Rc<dyn BoundsProvider>,
    pub on_select: Option<Rc<dyn Fn()>>,
    pub on_click: Option<Rc<dyn Fn()>>,
    pub on_focus_change: Option<Rc<dyn Fn(bool)>>,
}

impl BindingSpec {
    pub fn new(id: impl Into<String>, bounds: impl BoundsProvider + 'static) -> Self {
        Self {
            id: id.into(),
            section: None,
            row: None,
            col: None,
            disabled: false,
            bounds: Rc::new(bounds),
            on_select: None,
            on_click: None,
            on_focus_change: None,
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

    pub fn on_select(mut self, f: impl Fn() + 'static) -> Self {
        self.on_select = Some(Rc::new(f));
        self
    }

    pub fn on_click(mut self, f: impl Fn() + 'static) -> Self {
        self.on_click = Some(Rc::new(f));
        self
    }

    /// Called with the new flag whenever this element gains or loses focus.
    pub fn on_focus_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_focus_change = Some(Rc::new(f));
        self
    }
}

/// Capability to move focus to one specific element.
///
/// Holds only a weak registry reference; calling `focus` after the root or
/// the element is gone does nothing.
#[derive(Clone)]
pub struct FocusHandle {
    id: String,
    registry: WeakRegistry,
}

impl FocusHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns true if focus now rests on this element.
    pub fn focus(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.set_focus(&self.id))
    }
}

impl fmt::Debug for FocusHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusHandle").field("id", &self.id).finish()
    }
}

pub struct FocusableBinding {
    registry: FocusRegistry,
    descriptor: FocusDescriptor,
    generation: Option<u64>,
    subscription: Option<SubscriptionId>,
    focused: Rc<Cell<bool>>,
    activation: Rc<dyn Fn()>,
}

impl FocusableBinding {
    pub fn attach(registry: &FocusRegistry, spec: BindingSpec) -> Self {
        let BindingSpec {
            id,
            section,
            row,
            col,
            disabled,
            bounds,
            on_select,
            on_click,
            on_focus_change,
        } = spec;

        let focused = Rc::new(Cell::new(false));

        // Subscribe before registering so a register-time auto-focus is seen.
        let subscription = {
            let id = id.clone();
            let focused = Rc::clone(&focused);
            registry.subscribe(move |current| {
                let now = current == Some(id.as_str());
                if focused.get() != now {
                    focused.set(now);
                    if let Some(cb) = &on_focus_change {
                        cb(now);
                    }
                }
            })
        };

        let activation: Rc<dyn Fn()> = {
            let id = id.clone();
            let weak = registry.downgrade();
            Rc::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.set_focus(&id);
                }
                if let Some(f) = &on_select {
                    f();
                }
                if let Some(f) = &on_click {
                    f();
                }
            })
        };

        let descriptor = FocusDescriptor {
            id: id.clone(),
            section,
            row,
            col,
            bounds,
            disabled,
            on_activate: Some(Rc::clone(&activation)),
        };

        let generation = registry.register_tracked(descriptor.clone());
        focused.set(registry.is_focused(&id));
        trace!("Binding '{}' attached", id);

        Self {
            registry: registry.clone(),
            descriptor,
            generation: Some(generation),
            subscription: Some(subscription),
            focused,
            activation,
        }
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn is_attached(&self) -> bool {
        self.generation.is_some()
    }

    pub fn is_disabled(&self) -> bool {
        self.descriptor.disabled
    }

    /// Live "this element has focus" flag, for presentation.
    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    pub fn handle(&self) -> FocusHandle {
        FocusHandle {
            id: self.descriptor.id.clone(),
            registry: self.registry.downgrade(),
        }
    }

    pub fn focus(&self) -> bool {
        self.is_attached() && self.registry.set_focus(&self.descriptor.id)
    }

    /// User activation (click, press, enter). Disabled elements ignore it.
    pub fn activate(&self) {
        if self.descriptor.disabled || !self.is_attached() {
            return;
        }
        (self.activation)();
    }

    /// Re-register with a new disabled flag. Disabling the focused element
    /// clears focus. A binding whose id has since been re-mounted by another
    /// binding leaves that registration alone.
    pub fn set_disabled(&mut self, disabled: bool) {
        if self.descriptor.disabled == disabled || !self.is_attached() {
            return;
        }
        if self.registry.generation(&self.descriptor.id) != self.generation {
            trace!(
                "Binding '{}' no longer owns its registration, not re-registering",
                self.descriptor.id
            );
            return;
        }
        self.descriptor.disabled = disabled;
        self.generation = Some(self.registry.register_tracked(self.descriptor.clone()));
    }

    /// Unregister and stop observing. Safe to call more than once.
    pub fn detach(&mut self) {
        if let Some(generation) = self.generation.take() {
            self.registry
                .unregister_generation(&self.descriptor.id, generation);
            trace!("Binding '{}' detached", self.descriptor.id);
        }
        if let Some(subscription) = self.subscription.take() {
            self.registry.unsubscribe(subscription);
        }
        self.focused.set(false);
    }
}

impl Drop for FocusableBinding {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for FocusableBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusableBinding")
            .field("descriptor", &self.descriptor)
            .field("attached", &self.is_attached())
            .field("focused", &self.focused.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Bounds;
    use crate::core::registry::AutoFocus;
    use std::cell::RefCell;

    fn spec(id: &str, x: i32) -> BindingSpec {
        BindingSpec::new(id, move || Bounds::new(x, 0, 10, 10))
    }

    fn manual() -> FocusRegistry {
        FocusRegistry::with_auto_focus(AutoFocus::Disabled)
    }

    #[test]
    fn test_attach_registers_and_drop_unregisters() {
        let reg = manual();
        {
            let binding = FocusableBinding::attach(&reg, spec("a", 0).with_section("grid"));
            assert!(reg.contains("a"));
            assert_eq!(reg.get("a").unwrap().section.as_deref(), Some("grid"));
            assert!(binding.is_attached());
        }
        assert!(!reg.contains("a"));
    }

    #[test]
    fn test_is_focused_tracks_registry() {
        let reg = manual();
        let a = FocusableBinding::attach(&reg, spec("a", 0));
        let b = FocusableBinding::attach(&reg, spec("b", 20));
        assert!(!a.is_focused());

        reg.set_focus("a");
        assert!(a.is_focused());
        assert!(!b.is_focused());

        b.handle().focus();
        assert!(!a.is_focused());
        assert!(b.is_focused());
    }

    #[test]
    fn test_auto_focus_is_observed() {
        let reg = FocusRegistry::new();
        let a = FocusableBinding::attach(&reg, spec("a", 0));
        assert!(a.is_focused());
    }

    #[test]
    fn test_disabled_binding_never_auto_focuses() {
        let reg = FocusRegistry::new();
        let off = FocusableBinding::attach(&reg, spec("off", 0).with_disabled(true));
        assert!(!off.is_focused());
        assert!(!off.focus());
        assert_eq!(reg.current(), None);
    }

    #[test]
    fn test_activation_order() {
        let reg = manual();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let (c1, c2, c3) = (Rc::clone(&calls), Rc::clone(&calls), Rc::clone(&calls));
        let focus_probe = reg.clone();
        let a = FocusableBinding::attach(
            &reg,
            spec("a", 0)
                .on_select(move || {
                    let focused = focus_probe.is_focused("a");
                    c1.borrow_mut().push(format!("select(focused={focused})"));
                })
                .on_click(move || c2.borrow_mut().push("click".to_string()))
                .on_focus_change(move |f| c3.borrow_mut().push(format!("focus={f}"))),
        );

        a.activate();
        assert_eq!(
            *calls.borrow(),
            vec!["focus=true", "select(focused=true)", "click"]
        );
    }

    #[test]
    fn test_disabled_activation_is_noop() {
        let reg = manual();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let off = FocusableBinding::attach(
            &reg,
            spec("off", 0).with_disabled(true).on_click(move || h.set(h.get() + 1)),
        );
        off.activate();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_stale_handle_is_harmless() {
        let reg = manual();
        let handle = {
            let a = FocusableBinding::attach(&reg, spec("a", 0));
            a.handle()
        };
        assert!(!handle.focus());
        assert_eq!(reg.current(), None);

        let dropped_root = {
            let short = manual();
            let b = FocusableBinding::attach(&short, spec("b", 0));
            let h = b.handle();
            drop(b);
            h
        };
        assert!(!dropped_root.focus());
        assert_eq!(dropped_root.id(), "b");
    }

    #[test]
    fn test_remount_survives_old_detach() {
        let reg = manual();
        let old = FocusableBinding::attach(&reg, spec("a", 0));
        let new = FocusableBinding::attach(&reg, spec("a", 100));
        drop(old);
        assert!(reg.contains("a"));
        assert_eq!(reg.get("a").unwrap().current_bounds().x, 100);
        drop(new);
        assert!(!reg.contains("a"));
    }

    #[test]
    fn test_out_of_order_detach_clears_focus() {
        let reg = manual();
        let a = FocusableBinding::attach(&reg, spec("a", 0));
        let b = FocusableBinding::attach(&reg, spec("b", 20));
        let c = FocusableBinding::attach(&reg, spec("c", 40));
        b.focus();
        drop(a);
        assert_eq!(reg.current().as_deref(), Some("b"));
        drop(b);
        assert_eq!(reg.current(), None);
        assert!(!c.is_focused());
    }

    #[test]
    fn test_set_disabled_clears_focus() {
        let reg = manual();
        let mut a = FocusableBinding::attach(&reg, spec("a", 0));
        a.focus();
        a.set_disabled(true);
        assert!(a.is_disabled());
        assert!(!a.is_focused());
        assert_eq!(reg.current(), None);

        a.set_disabled(false);
        assert!(a.focus());
    }

    #[test]
    fn test_stale_set_disabled_keeps_newer_registration() {
        let reg = manual();
        let mut old = FocusableBinding::attach(&reg, spec("a", 0));
        let new = FocusableBinding::attach(&reg, spec("a", 100));
        assert!(new.focus());

        old.set_disabled(true);
        let live = reg.get("a").unwrap();
        assert!(!live.disabled);
        assert_eq!(live.current_bounds().x, 100);
        assert!(new.is_focused());
        assert!(!old.is_disabled());

        drop(old);
        assert!(reg.contains("a"));
    }

    #[test]
    fn test_detach_twice() {
        let reg = manual();
        let mut a = FocusableBinding::attach(&reg, spec("a", 0));
        a.detach();
        a.detach();
        assert!(!a.is_attached());
        assert!(!a.focus());
        assert!(!reg.contains("a"));
    }
}
