use std::cell::RefCell;
use std::rc::Rc;

use deep_observe::{ChangeEvent, ObserveObject, Value};
use serde_json::json;

fn test_object() -> serde_json::Value {
    json!({
        "editable": true,
        "disabled": false,
        "some": {
            "element": {
                "enable": true,
                "one": 1,
                "two": 2
            }
        }
    })
}

fn observe(json: serde_json::Value) -> ObserveObject {
    ObserveObject::observe(Value::from(json)).expect("test object is observable")
}

fn path_log() -> (Rc<RefCell<Vec<String>>>, impl Fn(&ChangeEvent) + 'static) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    (log, move |ev: &ChangeEvent| sink.borrow_mut().push(ev.path.clone()))
}

#[test]
fn change_event_fires_once_per_distinct_value() {
    let data = observe(test_object());
    let (log, listener) = path_log();
    data.on("change", listener);

    data.set("editable", false);
    data.set("editable", false);

    let element = data.at("some.element").unwrap();
    element.set("two", 2);
    element.set("one", 2);

    assert_eq!(*log.borrow(), vec!["editable", "some.element.one"]);
}

#[test]
fn keyed_change_event_fires_only_for_its_path() {
    let data = observe(test_object());
    let (log, listener) = path_log();
    data.on("change.some.element.one", listener);

    data.set("editable", false);
    data.set("editable", false);

    let element = data.at("some.element").unwrap();
    element.set("two", 2);
    element.set("one", 2);

    assert_eq!(*log.borrow(), vec!["some.element.one"]);
}

#[test]
fn replacing_whole_branch_then_mutating_inside_it() {
    let data = observe(test_object());
    let (log, listener) = path_log();
    data.on(["change.some.element.test", "change.some"], listener);

    data.set("some", Value::from(json!({"element": {"test": 1}})));
    data.at("some.element").unwrap().set("test", 2);

    assert_eq!(*log.borrow(), vec!["some", "some.element.test"]);
}

#[test]
fn replacing_branch_does_not_fire_descendant_keys() {
    let data = observe(test_object());
    let (leaf_log, leaf) = path_log();
    let (branch_log, branch) = path_log();
    data.on("change.some.element.test", leaf);
    data.on("change.some", branch);

    data.set("some", Value::from(json!({"element": {"test": 1}})));
    assert!(leaf_log.borrow().is_empty());
    assert_eq!(*branch_log.borrow(), vec!["some"]);

    data.at("some.element").unwrap().set("test", 2);
    assert_eq!(*leaf_log.borrow(), vec!["some.element.test"]);
    assert_eq!(*branch_log.borrow(), vec!["some", "some.element.test"]);
}

#[test]
fn cascade_runs_from_unqualified_to_most_specific_to_ancestors() {
    let data = observe(test_object());
    let order = Rc::new(RefCell::new(Vec::new()));
    for key in [
        "change.some",
        "change.some.element",
        "change",
        "change.some.element.one",
        "change.some.element.two",
        "change.editable",
    ] {
        let sink = Rc::clone(&order);
        data.on(key, move |ev: &ChangeEvent| {
            sink.borrow_mut().push(format!("{key} <- {}", ev.path))
        });
    }

    data.at("some.element").unwrap().set("one", 2);

    assert_eq!(
        *order.borrow(),
        vec![
            "change <- some.element.one",
            "change.some.element.one <- some.element.one",
            "change.some.element <- some.element.one",
            "change.some <- some.element.one",
        ]
    );
}

#[test]
fn sibling_listeners_are_independent() {
    let data = observe(test_object());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let (one, two) = (Rc::clone(&seen), Rc::clone(&seen));
    data.on("change.some.element.one", move |ev: &ChangeEvent| {
        one.borrow_mut().push(("one", ev.new_value.to_json()))
    });
    data.on("change.some.element.two", move |ev: &ChangeEvent| {
        two.borrow_mut().push(("two", ev.new_value.to_json()))
    });

    let element = data.at("some.element").unwrap();
    element.set("enable", false);
    element.set("one", 2);
    element.set("two", 3);

    assert_eq!(*seen.borrow(), vec![("one", json!(2)), ("two", json!(3))]);
}

#[test]
fn event_carries_old_and_new_value() {
    let data = observe(test_object());
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    data.on("change.disabled", move |ev: &ChangeEvent| {
        *sink.borrow_mut() = Some((ev.old_value.to_json(), ev.new_value.to_json()))
    });
    data.set("disabled", true);
    assert_eq!(*seen.borrow(), Some((json!(false), json!(true))));
}

#[test]
fn deep_equal_subtree_write_is_silent_but_stored() {
    let data = observe(test_object());
    let (log, listener) = path_log();
    data.on("change", listener);

    let replacement = Value::from(json!({"element": {"enable": true, "one": 1, "two": 2}}));
    assert!(!data.set("some", replacement.clone()));
    assert!(log.borrow().is_empty());
    assert!(data.value("some").same(&replacement));
}

#[test]
fn loose_equal_write_is_silent() {
    let data = observe(test_object());
    let (log, listener) = path_log();
    data.on("change", listener);
    data.at("some.element").unwrap().set("one", "1");
    assert!(log.borrow().is_empty());
    assert_eq!(data.get_path("some.element.one").as_str(), Some("1"));
}

#[test]
fn array_elements_are_addressed_by_index() {
    let data = observe(json!({"rows": [{"cells": [1, 2]}]}));
    let (log, listener) = path_log();
    data.on("change.rows.0", listener);

    let cells = data.at("rows.0.cells").unwrap();
    assert_eq!(cells.path(), "rows.0.cells");
    cells.set("1", 5);
    cells.push(6);

    assert_eq!(*log.borrow(), vec!["rows.0.cells.1", "rows.0.cells.2"]);
    assert_eq!(data.target().to_json(), json!({"rows": [{"cells": [1, 5, 6]}]}));
}

#[test]
fn observing_an_array_root() {
    let data = ObserveObject::create(deep_observe::Array::new());
    let (log, listener) = path_log();
    data.on("change.0", listener);
    data.push(Value::from(json!({"x": 1})));
    data.child("0").unwrap().set("x", 2);
    assert_eq!(*log.borrow(), vec!["0", "0.x"]);
}

#[test]
fn off_removes_a_single_key_registration() {
    let data = observe(test_object());
    let (log, listener) = path_log();
    let id = data.on(["change.editable", "change.disabled"], listener);

    assert!(data.off("change.editable", id));
    data.set("editable", false);
    data.set("disabled", true);
    assert_eq!(*log.borrow(), vec!["disabled"]);

    assert_eq!(data.off_all(id), 1);
    data.set("disabled", false);
    assert_eq!(*log.borrow(), vec!["disabled"]);
}

#[test]
fn listener_added_during_cascade_waits_for_next_write() {
    let data = observe(test_object());
    let (log, late) = path_log();
    let late = Rc::new(late);
    let handle = data.clone();
    let registered = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&registered);
    data.on("change", move |_: &ChangeEvent| {
        if !*flag.borrow() {
            *flag.borrow_mut() = true;
            let late = Rc::clone(&late);
            handle.on("change", move |ev: &ChangeEvent| late(ev));
        }
    });

    data.set("editable", false);
    assert!(log.borrow().is_empty());
    data.set("editable", true);
    assert_eq!(*log.borrow(), vec!["editable"]);
}

#[test]
fn listener_removed_during_cascade_still_runs_in_that_cascade() {
    let data = observe(test_object());
    let (log, second) = path_log();
    let handle = data.clone();
    let second_id = Rc::new(RefCell::new(None));
    let id_slot = Rc::clone(&second_id);
    data.on("change", move |_: &ChangeEvent| {
        if let Some(id) = id_slot.borrow_mut().take() {
            handle.off("change", id);
        }
    });
    *second_id.borrow_mut() = Some(data.on("change", second));

    data.set("editable", false);
    data.set("editable", true);
    assert_eq!(*log.borrow(), vec!["editable"]);
    assert_eq!(data.listener_count("change"), 1);
}

#[test]
fn set_path_writes_through_the_observer() {
    let data = observe(test_object());
    let (log, listener) = path_log();
    data.on("change.some.element", listener);
    assert!(data.set_path("some.element.enable", false));
    assert!(!data.set_path("some.element.enable", false));
    assert_eq!(*log.borrow(), vec!["some.element.enable"]);
}
