#![forbid(unsafe_code)]

//! Integration tests: forms built from field binders and adapted inputs,
//! driven the way a user would drive them.

use std::collections::BTreeMap;

use formcell_harness::{
    Checkbox, RenderLog, Rendered, TextInput, TextInputProps, Toggle, click, init_tracing,
    type_text,
};
use formcell_runtime::{
    AdapterProps, FieldBinder, Instance, ValueAdapter, use_controlled_fields, use_fields,
};

type Form = BTreeMap<String, String>;

// ============================================================================
// Fixtures
// ============================================================================

struct LoginForm {
    instance: Instance,
    username: ValueAdapter<TextInput>,
    password: ValueAdapter<TextInput>,
}

struct LoginFrame {
    fields: FieldBinder<Form>,
    username: Rendered<String>,
    password: Rendered<String>,
}

impl LoginForm {
    fn new(log: &RenderLog) -> Self {
        Self {
            instance: Instance::new("login"),
            username: formcell_runtime::input(TextInput::logged(log)),
            password: formcell_runtime::input(TextInput::logged(log)),
        }
    }

    fn render(&self) -> LoginFrame {
        self.instance.render(|cx| {
            let fields = use_fields(cx, || {
                Form::from([
                    ("username".to_owned(), String::new()),
                    ("password".to_owned(), String::new()),
                ])
            });
            let user = fields.field("username");
            let username = self.username.render(
                cx,
                AdapterProps::controlled(
                    user.value_or_default(),
                    user.sink(),
                    TextInputProps::named("username"),
                ),
            );
            let pass = fields.field("password");
            let password = self.password.render(
                cx,
                AdapterProps::controlled(
                    pass.value_or_default(),
                    pass.sink(),
                    TextInputProps::named("password"),
                ),
            );
            LoginFrame {
                fields,
                username,
                password,
            }
        })
    }
}

/// A row of adapted boolean inputs over one list.
fn render_switches<C>(
    instance: &Instance,
    adapters: &[ValueAdapter<C>],
    initial: &[bool],
) -> (FieldBinder<Vec<bool>>, Vec<Rendered<bool>>)
where
    C: formcell_runtime::InputComponent<Value = bool, Props = String, Output = Rendered<bool>>,
{
    instance.render(|cx| {
        let fields = use_fields(cx, || initial.to_vec());
        let frames = adapters
            .iter()
            .enumerate()
            .map(|(i, adapter)| {
                let field = fields.field(i);
                adapter.render(
                    cx,
                    AdapterProps::controlled(field.value_or_default(), field.sink(), format!("#{i}")),
                )
            })
            .collect();
        (fields, frames)
    })
}

// ============================================================================
// Keyed form
// ============================================================================

#[test]
fn login_form_collects_both_fields() {
    init_tracing();
    let log = RenderLog::new();
    let form = LoginForm::new(&log);

    let frame = form.render();
    type_text(&frame.username, "a@b.com");
    assert!(form.instance.needs_render());

    let frame = form.render();
    assert_eq!(frame.username.value, "a@b.com");
    type_text(&frame.password, "password");

    let frame = form.render();
    let expected = Form::from([
        ("username".to_owned(), "a@b.com".to_owned()),
        ("password".to_owned(), "password".to_owned()),
    ]);
    assert_eq!(frame.fields.value(), expected);
    assert!(frame.fields.is_touched(&"username".to_owned()));
    assert!(frame.fields.is_touched(&"password".to_owned()));
    assert_eq!(frame.fields.touched().len(), 2);
}

#[test]
fn untouched_inputs_skip_rendering() {
    let log = RenderLog::new();
    let form = LoginForm::new(&log);

    let frame = form.render();
    assert_eq!(log.len(), 2);
    type_text(&frame.username, "x");
    form.render();

    assert_eq!(
        log.entries(),
        vec![
            "TextInput(\"\")".to_owned(),
            "TextInput(\"\")".to_owned(),
            "TextInput(\"x\")".to_owned(),
        ],
        "the password input is memoized"
    );
}

#[test]
fn field_handlers_survive_rerenders() {
    let log = RenderLog::new();
    let form = LoginForm::new(&log);
    let first = form.render();
    type_text(&first.username, "abc");
    let second = form.render();

    assert!(first.username.on_change.ptr_eq(&second.username.on_change));
    assert!(first.password.on_change.ptr_eq(&second.password.on_change));
    assert_eq!(second.fields.handler_count(), 2);
}

// ============================================================================
// List of booleans
// ============================================================================

#[test]
fn toggle_row_flips_each_index() {
    init_tracing();
    let instance = Instance::new("toggles");
    let adapters: Vec<_> = (0..3).map(|_| formcell_runtime::input(Toggle::new())).collect();
    let initial = [false, true, false];

    for i in 0..3 {
        let (_, frames) = render_switches(&instance, &adapters, &initial);
        click(&frames[i]);
    }
    let (fields, frames) = render_switches(&instance, &adapters, &initial);

    assert_eq!(fields.value(), vec![true, false, true]);
    assert_eq!(
        frames.iter().map(|f| f.value).collect::<Vec<_>>(),
        vec![true, false, true]
    );
}

#[test]
fn parent_owned_toggle_row_flips_each_index() {
    let parent = Instance::new("settings");
    let adapters: Vec<_> = (0..3).map(|_| formcell_runtime::input(Toggle::new())).collect();

    let render = || {
        parent.render(|cx| {
            let flags = cx.use_state(|| vec![false, true, false]);
            let fields = use_controlled_fields(cx, flags.get(), flags.setter());
            let frames: Vec<_> = adapters
                .iter()
                .enumerate()
                .map(|(i, adapter)| {
                    let field = fields.field(i);
                    adapter.render(
                        cx,
                        AdapterProps::controlled(
                            field.value_or_default(),
                            field.sink(),
                            format!("#{i}"),
                        ),
                    )
                })
                .collect();
            (flags, fields, frames)
        })
    };

    for i in 0..3 {
        let (_, _, frames) = render();
        click(&frames[i]);
        assert!(parent.needs_render());
    }
    let (flags, fields, frames) = render();

    assert_eq!(flags.get(), vec![true, false, true]);
    assert!(fields.is_controlled());
    assert_eq!(fields.touched().len(), 3);
    assert_eq!(
        frames.iter().map(|f| f.value).collect::<Vec<_>>(),
        vec![true, false, true]
    );
}

#[test]
fn checkbox_row_extracts_synthetic_events() {
    let instance = Instance::new("checkboxes");
    let adapters: Vec<_> = (0..3).map(|_| formcell_runtime::input(Checkbox::new())).collect();
    let initial = [false, true, false];

    for i in 0..3 {
        let (_, frames) = render_switches(&instance, &adapters, &initial);
        click(&frames[i]);
    }
    let (fields, _) = render_switches(&instance, &adapters, &initial);
    assert_eq!(fields.value(), vec![true, false, true]);
    assert_eq!(fields.touched().len(), 3);
}

// ============================================================================
// Uncontrolled toggle
// ============================================================================

#[test]
fn uncontrolled_toggle_sequence() {
    init_tracing();
    let mounted = formcell_runtime::input(Toggle::new()).mount();
    let props = || AdapterProps::uncontrolled(false, "dark mode".to_owned());

    let mut seen = Vec::new();
    let frame = mounted.render(props());
    seen.push(frame.value);
    click(&frame);
    let frame = mounted.render(props());
    seen.push(frame.value);
    click(&frame);
    let frame = mounted.render(props());
    seen.push(frame.value);

    assert_eq!(seen, vec![false, true, false]);
}

// ============================================================================
// Controlled binder owned by a parent
// ============================================================================

#[test]
fn parent_owned_form_receives_changes() {
    let parent = Instance::new("parent");
    let adapter = formcell_runtime::input(TextInput::new());

    let render = || {
        parent.render(|cx| {
            let state = cx.use_state(|| Form::from([("city".to_owned(), "Oslo".to_owned())]));
            let fields = use_controlled_fields(cx, state.get(), state.setter());
            let city = fields.field("city");
            let frame = adapter.render(
                cx,
                AdapterProps::controlled(
                    city.value_or_default(),
                    city.sink(),
                    TextInputProps::named("city"),
                ),
            );
            (state, fields, frame)
        })
    };

    let (state, fields, frame) = render();
    assert!(fields.is_controlled());
    type_text(&frame, "Bergen");
    assert!(parent.needs_render());
    assert_eq!(state.get()["city"], "Bergen");

    let (_, fields, frame) = render();
    assert_eq!(frame.value, "Bergen");
    assert!(fields.is_touched(&"city".to_owned()));
}
