#![forbid(unsafe_code)]

//! Reference presentational inputs.
//!
//! Each component renders to a [`Rendered`] frame and emits through the
//! `on_change` it was given, in one fixed shape:
//!
//! | component | value | emits |
//! |---|---|---|
//! | [`TextInput`] | `String` | [`NativeEvent`] (`input`) |
//! | [`Toggle`] | `bool` | the literal value |
//! | [`Checkbox`] | `bool` | [`SyntheticEvent`] wrapping a `change` event |

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use formcell_core::{Emitted, NativeEvent, SyntheticEvent};
use formcell_runtime::{EmitHandler, InputComponent, InputProps};

// ============================================================================
// RenderLog
// ============================================================================

/// Shared record of component renders, as `"Name(value)"` lines.
#[derive(Clone, Default)]
pub struct RenderLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl RenderLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, component: &str, value: &impl fmt::Debug) {
        self.entries
            .borrow_mut()
            .push(format!("{component}({value:?})"));
    }

    /// All entries so far, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Renders recorded for `component`.
    #[must_use]
    pub fn count_for(&self, component: &str) -> usize {
        let prefix = format!("{component}(");
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.starts_with(&prefix))
            .count()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl fmt::Debug for RenderLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.borrow().iter()).finish()
    }
}

// ============================================================================
// Rendered frame
// ============================================================================

/// How a component reports a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitShape {
    Literal,
    Native,
    Synthetic,
}

/// Output of a reference component.
#[derive(Debug, Clone)]
pub struct Rendered<V> {
    pub component: &'static str,
    pub value: V,
    pub label: String,
    pub on_change: EmitHandler<V>,
    pub shape: EmitShape,
}

impl<V> Rendered<V> {
    /// Emit `value` in this component's shape.
    pub fn emit(&self, value: V) {
        let emitted = match self.shape {
            EmitShape::Literal => Emitted::Value(value),
            EmitShape::Native => NativeEvent::input(value).into(),
            EmitShape::Synthetic => SyntheticEvent::wrap(NativeEvent::change(value)).into(),
        };
        self.on_change.call(emitted);
    }
}

/// Type `text` into a rendered text input, replacing its content.
pub fn type_text(frame: &Rendered<String>, text: &str) {
    frame.emit(text.to_owned());
}

/// Click a rendered boolean input.
pub fn click(frame: &Rendered<bool>) {
    frame.emit(!frame.value);
}

// ============================================================================
// Components
// ============================================================================

/// Props of a [`TextInput`] besides value and handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInputProps {
    pub name: String,
    pub placeholder: String,
}

impl TextInputProps {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            placeholder: String::new(),
        }
    }
}

/// Single-line text input emitting native `input` events.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    log: RenderLog,
}

impl TextInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn logged(log: &RenderLog) -> Self {
        Self { log: log.clone() }
    }
}

impl InputComponent for TextInput {
    type Value = String;
    type Props = TextInputProps;
    type Output = Rendered<String>;

    fn render(&self, props: InputProps<String, TextInputProps>) -> Rendered<String> {
        self.log.record("TextInput", &props.value);
        let label = if props.value.is_empty() {
            props.rest.placeholder
        } else {
            props.rest.name
        };
        Rendered {
            component: "TextInput",
            value: props.value,
            label,
            on_change: props.on_change,
            shape: EmitShape::Native,
        }
    }
}

/// On/off switch emitting the literal new value.
#[derive(Debug, Clone, Default)]
pub struct Toggle {
    log: RenderLog,
}

impl Toggle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn logged(log: &RenderLog) -> Self {
        Self { log: log.clone() }
    }
}

impl InputComponent for Toggle {
    type Value = bool;
    type Props = String;
    type Output = Rendered<bool>;

    fn render(&self, props: InputProps<bool, String>) -> Rendered<bool> {
        self.log.record("Toggle", &props.value);
        Rendered {
            component: "Toggle",
            value: props.value,
            label: props.rest,
            on_change: props.on_change,
            shape: EmitShape::Literal,
        }
    }
}

/// Checkbox emitting synthetic `change` events.
#[derive(Debug, Clone, Default)]
pub struct Checkbox {
    log: RenderLog,
}

impl Checkbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn logged(log: &RenderLog) -> Self {
        Self { log: log.clone() }
    }
}

impl InputComponent for Checkbox {
    type Value = bool;
    type Props = String;
    type Output = Rendered<bool>;

    fn render(&self, props: InputProps<bool, String>) -> Rendered<bool> {
        self.log.record("Checkbox", &props.value);
        Rendered {
            component: "Checkbox",
            value: props.value,
            label: props.rest,
            on_change: props.on_change,
            shape: EmitShape::Synthetic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcell_runtime::{AdapterProps, input};

    #[test]
    fn display_names_come_from_types() {
        assert_eq!(input(TextInput::new()).display_name(), "TextInput");
        assert_eq!(input(Toggle::new()).display_name(), "Toggle");
        assert_eq!(input(Checkbox::new()).display_name(), "Checkbox");
    }

    #[test]
    fn render_log_counts_per_component() {
        let log = RenderLog::new();
        log.record("Toggle", &true);
        log.record("Checkbox", &false);
        log.record("Toggle", &false);
        assert_eq!(log.count_for("Toggle"), 2);
        assert_eq!(log.entries()[1], "Checkbox(false)");
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn text_input_shows_placeholder_when_empty() {
        let mounted = input(TextInput::new()).mount();
        let props = TextInputProps {
            name: "email".into(),
            placeholder: "you@example.com".into(),
        };
        let frame = mounted.render(AdapterProps::uncontrolled(String::new(), props.clone()));
        assert_eq!(frame.label, "you@example.com");

        type_text(&frame, "a");
        let frame = mounted.render(AdapterProps::uncontrolled(String::new(), props));
        assert_eq!(frame.label, "email");
        assert_eq!(frame.value, "a");
    }

    #[test]
    fn checkbox_events_reduce_to_values() {
        let mounted = input(Checkbox::new()).mount();
        let frame = mounted.render(AdapterProps::uncontrolled(false, "agree".to_owned()));
        click(&frame);
        let frame = mounted.render(AdapterProps::uncontrolled(false, "agree".to_owned()));
        assert!(frame.value);
    }
}
