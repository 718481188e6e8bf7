#![forbid(unsafe_code)]

//! Render-lifecycle host: one [`Instance`] per mounted component.
//!
//! A component is a function re-invoked on every render. Anything it must
//! keep between renders lives in the instance's hook slots, handed out in
//! call order by [`Hooks`]:
//!
//! - [`Hooks::use_state`]: retained state. Writes mark the instance as
//!   needing a re-render.
//! - [`Hooks::use_ref`]: a persisted mutable cell. Writes do not request a
//!   re-render.
//! - [`Hooks::use_persisted`]: a value created on the first render and
//!   returned (cloned) on every later one.
//!
//! # Invariants
//!
//! 1. The n-th hook call of every render receives the n-th slot.
//! 2. Slot initializers run on the first render only.
//! 3. Slots are dropped with the instance, in creation order.
//!
//! # Failure Modes
//!
//! - A hook call whose type differs from the one that created the slot
//!   panics (hook order changed between renders).
//! - Rendering fewer hooks than the previous render logs a warning; the
//!   unused slots are kept.

use std::any::Any;
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::reactive::{StateCell, Subscription};

/// One logical, mounted component instance.
pub struct Instance {
    label: Cow<'static, str>,
    slots: RefCell<Vec<Box<dyn Any>>>,
    dirty: Rc<Cell<bool>>,
    renders: Cell<u64>,
}

impl Instance {
    /// Create an instance. It starts out needing its first render.
    #[must_use]
    pub fn new(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            slots: RefCell::new(Vec::new()),
            dirty: Rc::new(Cell::new(true)),
            renders: Cell::new(0),
        }
    }

    /// Run one render pass of the component.
    pub fn render<R>(&self, component: impl FnOnce(&mut Hooks<'_>) -> R) -> R {
        let pass = self.renders.get();
        let _span = tracing::debug_span!("render", instance = %self.label, pass).entered();
        self.dirty.set(false);

        let mut hooks = Hooks {
            instance: self,
            cursor: 0,
        };
        let out = component(&mut hooks);

        let slots = self.slots.borrow().len();
        if pass > 0 && hooks.cursor < slots {
            tracing::warn!(
                instance = %self.label,
                used = hooks.cursor,
                slots,
                "render used fewer hooks than a previous render"
            );
        }
        self.renders.set(pass + 1);
        out
    }

    /// Whether retained state changed since the last render began.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.dirty.get()
    }

    /// Request a re-render without a state change.
    pub fn invalidate(&self) {
        self.dirty.set(true);
    }

    /// Completed render passes.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.renders.get()
    }

    /// Number of hook slots allocated so far.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.borrow().len()
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("label", &self.label)
            .field("slots", &self.slot_count())
            .field("renders", &self.renders.get())
            .field("dirty", &self.dirty.get())
            .finish()
    }
}

/// State slot: the cell plus the subscription that marks the instance dirty.
#[derive(Clone)]
struct StateSlot<T> {
    cell: StateCell<T>,
    _dirty_on_write: Rc<Subscription>,
}

/// Hook cursor for one render pass.
pub struct Hooks<'a> {
    instance: &'a Instance,
    cursor: usize,
}

impl Hooks<'_> {
    /// Retained state, initialized by `init` on the first render.
    pub fn use_state<T: Clone + 'static>(&mut self, init: impl FnOnce() -> T) -> StateCell<T> {
        let dirty = Rc::clone(&self.instance.dirty);
        let slot = self.slot("use_state", || {
            let cell = StateCell::new(init());
            let sub = cell.subscribe(move |_| dirty.set(true));
            StateSlot {
                cell,
                _dirty_on_write: Rc::new(sub),
            }
        });
        slot.cell
    }

    /// Persisted mutable cell, initialized by `init` on the first render.
    pub fn use_ref<T: 'static>(&mut self, init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
        self.slot("use_ref", || Rc::new(RefCell::new(init())))
    }

    /// A value created on the first render and cloned out on every render.
    pub fn use_persisted<T: Clone + 'static>(&mut self, init: impl FnOnce() -> T) -> T {
        self.slot("use_persisted", init)
    }

    /// Label of the instance being rendered.
    #[must_use]
    pub fn instance_label(&self) -> &str {
        self.instance.label()
    }

    /// Whether this is the instance's first render.
    #[must_use]
    pub fn is_first_render(&self) -> bool {
        self.instance.render_count() == 0
    }

    fn slot<T: Clone + 'static>(&mut self, hook: &'static str, init: impl FnOnce() -> T) -> T {
        let index = self.cursor;
        self.cursor += 1;

        let existing = {
            let slots = self.instance.slots.borrow();
            slots
                .get(index)
                .map(|slot| slot.downcast_ref::<T>().cloned())
        };
        match existing {
            Some(Some(value)) => value,
            Some(None) => panic!(
                "hook order changed in instance `{}`: slot {index} was not created by `{hook}` \
                 with type `{}`",
                self.instance.label,
                std::any::type_name::<T>()
            ),
            None => {
                let value = init();
                self.instance.slots.borrow_mut().push(Box::new(value.clone()));
                value
            }
        }
    }
}

impl std::fmt::Debug for Hooks<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("instance", &self.instance.label)
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_instance_needs_render() {
        let inst = Instance::new("form");
        assert!(inst.needs_render());
        inst.render(|_| {});
        assert!(!inst.needs_render());
        assert_eq!(inst.render_count(), 1);
    }

    #[test]
    fn state_persists_across_renders() {
        let inst = Instance::new("counter");
        let first = inst.render(|cx| cx.use_state(|| 1));
        first.set(2);
        let second = inst.render(|cx| cx.use_state(|| 100));
        assert!(first.ptr_eq(&second));
        assert_eq!(second.get(), 2, "initializer must not rerun");
    }

    #[test]
    fn state_write_marks_dirty() {
        let inst = Instance::new("counter");
        let cell = inst.render(|cx| cx.use_state(|| 0));
        assert!(!inst.needs_render());
        cell.set(1);
        assert!(inst.needs_render());
    }

    #[test]
    fn ref_write_does_not_mark_dirty() {
        let inst = Instance::new("cache");
        let r = inst.render(|cx| cx.use_ref(Vec::<u8>::new));
        r.borrow_mut().push(1);
        assert!(!inst.needs_render());

        let again = inst.render(|cx| cx.use_ref(Vec::<u8>::new));
        assert!(Rc::ptr_eq(&r, &again));
        assert_eq!(*again.borrow(), vec![1]);
    }

    #[test]
    fn persisted_value_created_once() {
        let inst = Instance::new("p");
        let created = Rc::new(Cell::new(0));
        for _ in 0..3 {
            let c = Rc::clone(&created);
            let v = inst.render(|cx| {
                cx.use_persisted(|| {
                    c.set(c.get() + 1);
                    Rc::new(5)
                })
            });
            assert_eq!(*v, 5);
        }
        assert_eq!(created.get(), 1);
    }

    #[test]
    fn slots_follow_call_order() {
        let inst = Instance::new("two");
        let (a, b) = inst.render(|cx| (cx.use_state(|| 'a'), cx.use_state(|| 'b')));
        let (a2, b2) = inst.render(|cx| (cx.use_state(|| 'x'), cx.use_state(|| 'y')));
        assert!(a.ptr_eq(&a2));
        assert!(b.ptr_eq(&b2));
        assert_eq!(inst.slot_count(), 2);
    }

    #[test]
    #[should_panic(expected = "hook order changed")]
    fn hook_type_mismatch_panics() {
        let inst = Instance::new("bad");
        inst.render(|cx| {
            let _ = cx.use_state(|| 0u8);
        });
        inst.render(|cx| {
            let _ = cx.use_ref(|| 0u8);
        });
    }

    #[test]
    fn invalidate_requests_render() {
        let inst = Instance::new("i");
        inst.render(|_| {});
        inst.invalidate();
        assert!(inst.needs_render());
    }

    #[test]
    fn first_render_flag() {
        let inst = Instance::new("f");
        assert!(inst.render(|cx| cx.is_first_render()));
        assert!(!inst.render(|cx| cx.is_first_render()));
    }
}
