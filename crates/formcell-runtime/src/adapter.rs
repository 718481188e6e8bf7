#![forbid(unsafe_code)]

//! Value adapters: one interface for controlled and uncontrolled inputs.
//!
//! A presentational [`InputComponent`] only knows `{value, on_change, rest}`.
//! [`input`] wraps it in a [`ValueAdapter`] that
//!
//! - drives it from the caller's value and sink (controlled), or from an
//!   internal state slot seeded once from a default (uncontrolled);
//! - reduces whatever the component emits ([`Emitted`]: literal or raw
//!   event) to a plain value before the caller sees it;
//! - skips re-rendering the component when neither the props nor the
//!   internal state changed.
//!
//! # Invariants
//!
//! 1. The uncontrolled slot is seeded on the first uncontrolled render only;
//!    later `default_value`s are ignored.
//! 2. The component never sees `default_value`.
//! 3. The `on_change` the component receives keeps its identity while the
//!    target sink does.
//! 4. Adapters forward literal values only, never updaters.
//!
//! # Failure Modes
//!
//! - Switching an instance between controlled and uncontrolled is allowed
//!   and logged at debug; an uncontrolled slot keeps its earlier value.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use formcell_core::{Change, Emitted};

use crate::fields::FieldHandler;
use crate::instance::{Hooks, Instance};
use crate::reactive::{Callback, StateAction, StateCell, StateSetter};

/// Display name used when a component has none of its own.
pub const DEFAULT_DISPLAY_NAME: &str = "InputComponent";

/// The `on_change` a wrapped component receives.
pub type EmitHandler<V> = Callback<Emitted<V>>;

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Where an adapter delivers extracted values. Compared by identity.
pub enum ValueSink<V> {
    /// A plain value callback.
    Plain(Callback<V>),
    /// A field handler from a [`FieldBinder`](crate::fields::FieldBinder).
    Field(FieldHandler<V>),
    /// A state setter.
    State(StateSetter<V>),
}

impl<V: 'static> ValueSink<V> {
    #[must_use]
    pub fn plain(callback: Callback<V>) -> Self {
        Self::Plain(callback)
    }

    #[must_use]
    pub fn field(handler: FieldHandler<V>) -> Self {
        Self::Field(handler)
    }

    #[must_use]
    pub fn state(setter: StateSetter<V>) -> Self {
        Self::State(setter)
    }

    /// Deliver a literal value.
    pub fn send(&self, value: V) {
        match self {
            Self::Plain(cb) => cb.call(value),
            Self::Field(handler) => handler.call(Change::Value(value)),
            Self::State(setter) => setter.call(StateAction::Replace(value)),
        }
    }
}

impl<V> Clone for ValueSink<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Plain(cb) => Self::Plain(cb.clone()),
            Self::Field(h) => Self::Field(h.clone()),
            Self::State(s) => Self::State(s.clone()),
        }
    }
}

impl<V> PartialEq for ValueSink<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Plain(a), Self::Plain(b)) => a.ptr_eq(b),
            (Self::Field(a), Self::Field(b)) => a.ptr_eq(b),
            (Self::State(a), Self::State(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl<V> fmt::Debug for ValueSink<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(cb) => f.debug_tuple("Plain").field(cb).finish(),
            Self::Field(h) => f.debug_tuple("Field").field(h).finish(),
            Self::State(s) => f.debug_tuple("State").field(s).finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Props
// ---------------------------------------------------------------------------

/// Props a wrapped component receives.
#[derive(Debug, Clone, PartialEq)]
pub struct InputProps<V, P> {
    pub value: V,
    pub on_change: EmitHandler<V>,
    /// Everything else, forwarded untouched.
    pub rest: P,
}

/// Who owns the adapter's value.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterMode<V> {
    /// The caller supplies the value and receives every change.
    Controlled { value: V, on_change: ValueSink<V> },
    /// The adapter keeps its own value, seeded once from `default_value`.
    Uncontrolled { default_value: V },
}

/// Props accepted by a [`ValueAdapter`].
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterProps<V, P> {
    pub mode: AdapterMode<V>,
    pub rest: P,
}

impl<V, P> AdapterProps<V, P> {
    /// Caller-owned value and sink.
    #[must_use]
    pub fn controlled(value: V, on_change: ValueSink<V>, rest: P) -> Self {
        Self {
            mode: AdapterMode::Controlled { value, on_change },
            rest,
        }
    }

    /// Internally owned value seeded from `default_value`.
    #[must_use]
    pub fn uncontrolled(default_value: V, rest: P) -> Self {
        Self {
            mode: AdapterMode::Uncontrolled { default_value },
            rest,
        }
    }

    #[must_use]
    pub fn is_controlled(&self) -> bool {
        matches!(self.mode, AdapterMode::Controlled { .. })
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// A presentational component driven by `{value, on_change, rest}`.
pub trait InputComponent: 'static {
    type Value: Clone + PartialEq + 'static;
    type Props: Clone + PartialEq + 'static;
    type Output: Clone + 'static;

    fn render(&self, props: InputProps<Self::Value, Self::Props>) -> Self::Output;

    /// Name shown in logs and diagnostics. Defaults to the type's own name;
    /// `None` means anonymous.
    fn display_name(&self) -> Option<Cow<'static, str>> {
        Some(Cow::Borrowed(short_type_name::<Self>()))
    }
}

/// Last path segment of a type name, without generic arguments.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// A closure used as an [`InputComponent`]. Anonymous unless [`named`].
///
/// [`named`]: FnComponent::named
pub struct FnComponent<V, P, O, F> {
    render: F,
    name: Option<&'static str>,
    _marker: PhantomData<fn(InputProps<V, P>) -> O>,
}

/// Wrap a render closure as a component.
pub fn component_fn<V, P, O, F>(render: F) -> FnComponent<V, P, O, F>
where
    F: Fn(InputProps<V, P>) -> O,
{
    FnComponent {
        render,
        name: None,
        _marker: PhantomData,
    }
}

impl<V, P, O, F> FnComponent<V, P, O, F> {
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }
}

impl<V, P, O, F> InputComponent for FnComponent<V, P, O, F>
where
    V: Clone + PartialEq + 'static,
    P: Clone + PartialEq + 'static,
    O: Clone + 'static,
    F: Fn(InputProps<V, P>) -> O + 'static,
{
    type Value = V;
    type Props = P;
    type Output = O;

    fn render(&self, props: InputProps<V, P>) -> O {
        (self.render)(props)
    }

    fn display_name(&self) -> Option<Cow<'static, str>> {
        self.name.map(Cow::Borrowed)
    }
}

impl<V, P, O, F> fmt::Debug for FnComponent<V, P, O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnComponent")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// ValueAdapter
// ---------------------------------------------------------------------------

/// Per-instance memo: the last render and the cached forwarding handler.
struct AdapterMemo<C: InputComponent> {
    last: Option<LastRender<C>>,
    forward: Option<(ValueSink<C::Value>, EmitHandler<C::Value>)>,
    internal: ValueSink<C::Value>,
    mode_controlled: Option<bool>,
}

struct LastRender<C: InputComponent> {
    props: AdapterProps<C::Value, C::Props>,
    version: u64,
    output: C::Output,
}

/// Whether two props produce the same component input. An uncontrolled
/// default is read once, so only `rest` matters between uncontrolled props.
fn renders_alike<V: PartialEq, P: PartialEq>(
    prev: &AdapterProps<V, P>,
    next: &AdapterProps<V, P>,
) -> bool {
    match (&prev.mode, &next.mode) {
        (AdapterMode::Uncontrolled { .. }, AdapterMode::Uncontrolled { .. }) => {
            prev.rest == next.rest
        }
        _ => prev == next,
    }
}

impl<C: InputComponent> AdapterMemo<C> {
    fn new(state: StateCell<Option<C::Value>>) -> Self {
        let internal = ValueSink::plain(Callback::new(move |value: C::Value| {
            state.set(Some(value));
        }));
        Self {
            last: None,
            forward: None,
            internal,
            mode_controlled: None,
        }
    }

    /// The component-facing `on_change` for `target`, reused while `target` is.
    fn forward_to(&mut self, target: &ValueSink<C::Value>) -> EmitHandler<C::Value> {
        if let Some((cached_target, handler)) = &self.forward {
            if cached_target == target {
                return handler.clone();
            }
        }
        let sink = target.clone();
        let handler = Callback::new(move |emitted: Emitted<C::Value>| {
            sink.send(emitted.into_value());
        });
        self.forward = Some((target.clone(), handler.clone()));
        handler
    }
}

/// A component wrapped for controlled/uncontrolled use.
pub struct ValueAdapter<C> {
    component: Rc<C>,
    display_name: Cow<'static, str>,
}

/// Wrap `component` in a [`ValueAdapter`].
pub fn input<C: InputComponent>(component: C) -> ValueAdapter<C> {
    let display_name = component
        .display_name()
        .unwrap_or(Cow::Borrowed(DEFAULT_DISPLAY_NAME));
    ValueAdapter {
        component: Rc::new(component),
        display_name,
    }
}

impl<C> Clone for ValueAdapter<C> {
    fn clone(&self) -> Self {
        Self {
            component: Rc::clone(&self.component),
            display_name: self.display_name.clone(),
        }
    }
}

impl<C: InputComponent> ValueAdapter<C> {
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn component(&self) -> &C {
        &self.component
    }

    /// Render inside the current instance. Uses two hook slots.
    pub fn render(
        &self,
        cx: &mut Hooks<'_>,
        props: AdapterProps<C::Value, C::Props>,
    ) -> C::Output {
        let seed = match &props.mode {
            AdapterMode::Uncontrolled { default_value } => Some(default_value.clone()),
            AdapterMode::Controlled { .. } => None,
        };
        let state = cx.use_state(move || seed);
        let memo = cx.use_ref(|| AdapterMemo::<C>::new(state.clone()));
        let mut memo = memo.borrow_mut();

        let controlled = props.is_controlled();
        match memo.mode_controlled {
            None => tracing::debug!(
                component = %self.display_name,
                mode = if controlled { "controlled" } else { "uncontrolled" },
                "adapter mounted"
            ),
            Some(prev) if prev != controlled => tracing::debug!(
                component = %self.display_name,
                controlled,
                "adapter switched mode"
            ),
            Some(_) => {}
        }
        memo.mode_controlled = Some(controlled);

        let (value, target) = match &props.mode {
            AdapterMode::Controlled { value, on_change } => (value.clone(), on_change.clone()),
            AdapterMode::Uncontrolled { default_value } => {
                if state.with(Option::is_none) {
                    state.seed(Some(default_value.clone()));
                }
                let value = state.get().unwrap_or_else(|| default_value.clone());
                (value, memo.internal.clone())
            }
        };

        let version = state.version();
        if let Some(last) = &memo.last {
            if last.version == version && renders_alike(&last.props, &props) {
                tracing::debug!(component = %self.display_name, "memoized render");
                return last.output.clone();
            }
        }

        let on_change = memo.forward_to(&target);
        let output = self.component.render(InputProps {
            value,
            on_change,
            rest: props.rest.clone(),
        });
        memo.last = Some(LastRender {
            props,
            version,
            output: output.clone(),
        });
        output
    }

    /// Mount the adapter as its own component instance.
    #[must_use]
    pub fn mount(&self) -> MountedInput<C> {
        MountedInput {
            adapter: self.clone(),
            instance: Instance::new(self.display_name.clone()),
        }
    }
}

impl<C> fmt::Debug for ValueAdapter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueAdapter")
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

/// A [`ValueAdapter`] with its own [`Instance`].
pub struct MountedInput<C> {
    adapter: ValueAdapter<C>,
    instance: Instance,
}

impl<C: InputComponent> MountedInput<C> {
    /// Render with `props`.
    pub fn render(&self, props: AdapterProps<C::Value, C::Props>) -> C::Output {
        self.instance.render(|cx| self.adapter.render(cx, props))
    }

    /// Whether internal state changed since the last render.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.instance.needs_render()
    }

    #[must_use]
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    #[must_use]
    pub fn adapter(&self) -> &ValueAdapter<C> {
        &self.adapter
    }
}

impl<C> fmt::Debug for MountedInput<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedInput")
            .field("adapter", &self.adapter)
            .field("instance", &self.instance)
            .finish()
    }
}
