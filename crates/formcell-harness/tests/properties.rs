#![forbid(unsafe_code)]

//! Property tests for field binders and value adapters.

use std::collections::BTreeMap;

use formcell_harness::{Toggle, click, init_tracing};
use formcell_runtime::{AdapterProps, BatchScope, FieldBinder, Instance, input, use_fields};
use proptest::prelude::*;

type Scores = BTreeMap<String, i64>;

fn scores() -> impl Strategy<Value = Scores> {
    prop::collection::btree_map("[a-e]{1,3}", -1000i64..1000, 1..8)
}

/// A form plus one of its keys.
fn scores_and_key() -> impl Strategy<Value = (Scores, String)> {
    scores().prop_flat_map(|form| {
        let keys: Vec<String> = form.keys().cloned().collect();
        (Just(form), prop::sample::select(keys))
    })
}

#[derive(Debug, Clone)]
enum Op {
    Set(usize, i64),
    Add(usize, i64),
}

fn ops(keys: usize) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        (0..keys, -50i64..50).prop_map(|(k, v)| Op::Set(k, v)),
        (0..keys, -50i64..50).prop_map(|(k, d)| Op::Add(k, d)),
    ];
    prop::collection::vec(op, 0..24)
}

proptest! {
    #[test]
    fn handler_identity_is_stable_across_renders(
        (form, key) in scores_and_key(),
        renders in 1usize..6,
    ) {
        let instance = Instance::new("p1");
        let first = instance.render(|cx| use_fields(cx, || form.clone()).field(key.as_str()));
        for n in 0..renders {
            let again = instance.render(|cx| {
                let fields = use_fields(cx, || form.clone());
                if n % 2 == 0 {
                    fields.set(key.as_str(), n as i64);
                }
                fields.field(key.as_str())
            });
            prop_assert!(first.on_change.ptr_eq(&again.on_change));
        }
    }

    #[test]
    fn literal_set_preserves_other_keys((form, key) in scores_and_key(), x in any::<i64>()) {
        let fields = FieldBinder::uncontrolled(form.clone());
        fields.field(key.as_str()).set(x);
        let after = fields.value();
        prop_assert_eq!(after[&key], x);
        for (k, v) in &form {
            if *k != key {
                prop_assert_eq!(&after[k], v);
            }
        }
        prop_assert_eq!(after.len(), form.len());
    }

    #[test]
    fn updater_sees_previous_value((form, key) in scores_and_key(), d in -1000i64..1000) {
        let fields = FieldBinder::uncontrolled(form.clone());
        fields.update(key.as_str(), move |v| v + d);
        prop_assert_eq!(fields.value()[&key], form[&key] + d);
    }

    #[test]
    fn touched_is_monotonic(form in scores(), script in ops(8)) {
        let keys: Vec<String> = form.keys().cloned().collect();
        let fields = FieldBinder::uncontrolled(form);
        let mut seen = Vec::<String>::new();

        for op in script {
            let key = match op {
                Op::Set(i, v) => {
                    let key = keys[i % keys.len()].clone();
                    fields.set(key.as_str(), v);
                    key
                }
                Op::Add(i, d) => {
                    let key = keys[i % keys.len()].clone();
                    fields.update(key.as_str(), move |v| v + d);
                    key
                }
            };
            if !seen.contains(&key) {
                seen.push(key);
            }
            for k in &seen {
                prop_assert!(fields.is_touched(k));
            }
        }
        prop_assert_eq!(fields.touched().len(), seen.len());
    }

    #[test]
    fn functional_updates_in_one_turn_compose(
        (form, key) in scores_and_key(),
        deltas in prop::collection::vec(-100i64..100, 1..6),
    ) {
        let instance = Instance::new("p4");
        let field = instance.render(|cx| use_fields(cx, || form.clone()).field(key.as_str()));
        {
            let _batch = BatchScope::new();
            for d in deltas.clone() {
                field.update(move |v| v + d);
            }
        }
        let total: i64 = deltas.iter().sum();
        let now = instance.render(|cx| use_fields(cx, || form.clone()).field(key.as_str()));
        prop_assert_eq!(now.value, Some(form[&key] + total));
    }

    #[test]
    fn uncontrolled_default_is_read_once(
        defaults in prop::collection::vec(any::<bool>(), 1..8),
        clicks in prop::collection::vec(any::<bool>(), 0..8),
    ) {
        let mounted = input(Toggle::new()).mount();
        let mut expected = defaults[0];
        let mut frame = mounted.render(AdapterProps::uncontrolled(expected, String::new()));

        for (i, click_now) in clicks.iter().enumerate() {
            if *click_now {
                click(&frame);
                expected = !expected;
            }
            let default = defaults[i % defaults.len()];
            frame = mounted.render(AdapterProps::uncontrolled(default, String::new()));
            prop_assert_eq!(frame.value, expected);
        }
    }
}

#[test]
fn string_updates_compose_in_order() {
    init_tracing();
    let fields = FieldBinder::uncontrolled(BTreeMap::from([("name".to_owned(), "A".to_owned())]));
    let name = fields.field("name");
    name.update(|v| format!("{v}X"));
    name.update(|v| format!("{v}Y"));
    assert_eq!(fields.value()["name"], "AXY");
}
