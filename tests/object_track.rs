use objtrack::prelude::*;
use serde_json::{json, Value};

fn add_number(this: &mut DynamicObject, args: &[Value]) -> anyhow::Result<Value> {
    let current = this.value("prop1").and_then(|v| v.as_i64()).unwrap_or(0);
    let n = arg(args, 0).as_i64().unwrap_or(0);
    this.assign("prop1", json!(current + n))?;
    Ok(Value::Null)
}

fn append_text(this: &mut DynamicObject, args: &[Value]) -> anyhow::Result<Value> {
    let current = this.value("prop2").and_then(|v| v.as_str().map(String::from)).unwrap_or_default();
    let s = arg(args, 0).as_str().unwrap_or_default();
    this.assign("prop2", json!(format!("{}{}", current, s)))?;
    Ok(Value::Null)
}

fn test_object() -> DynamicObject {
    DynamicObject::new()
        .data("prop1", 1)
        .data("prop2", "a")
        .method("method1", add_number)
        .method("method2", append_text)
}

fn prop(object: &Shared<DynamicObject>, key: &str) -> Value {
    object.read(|o| o.value(key)).unwrap().unwrap_or(Value::Null)
}

#[test]
fn tracks_assignments_and_forwards_them() {
    let object = Shared::new(test_object());
    let tracked = track(&object).unwrap();

    tracked.set("prop1", 2).unwrap();
    tracked.set("prop2", "b").unwrap();
    tracked.set("prop1", 3).unwrap();

    assert_eq!(prop(&object, "prop1"), json!(3));
    assert_eq!(prop(&object, "prop2"), json!("b"));
    assert_eq!(
        get_actions(&tracked).unwrap().snapshot(),
        vec![
            Action::assign("prop1", 2),
            Action::assign("prop2", "b"),
            Action::assign("prop1", 3),
        ]
    );
}

#[test]
fn tracks_method_calls_and_forwards_them() {
    let object = Shared::new(test_object());
    let tracked = track(&object).unwrap();

    tracked.call("method1", &[json!(1)]).unwrap();
    tracked.call("method2", &[json!("bc")]).unwrap();
    tracked.call("method1", &[json!(2), json!(3), json!(4)]).unwrap();

    assert_eq!(prop(&object, "prop1"), json!(4));
    assert_eq!(prop(&object, "prop2"), json!("abc"));
    assert_eq!(
        serde_json::to_value(get_actions(&tracked).unwrap()).unwrap(),
        json!([
            {"key": "method1", "arguments": [1]},
            {"key": "method2", "arguments": ["bc"]},
            {"key": "method1", "arguments": [2, 3, 4]},
        ])
    );
}

#[test]
fn reads_are_live() {
    let object = Shared::new(test_object());
    let tracked = track(&object).unwrap();

    tracked.set("prop1", 2).unwrap();
    assert_eq!(tracked.get("prop1").unwrap(), json!(2));

    object.write(|o| o.assign("prop1", json!(3))).unwrap().unwrap();
    assert_eq!(tracked.get("prop1").unwrap(), json!(3));

    object.write(|o| o.invoke("method1", &[json!(1)])).unwrap().unwrap();
    assert_eq!(tracked.get("prop1").unwrap(), json!(4));
    assert_eq!(get_actions(&tracked).unwrap().len(), 1);
}

#[test]
fn calls_with_a_different_receiver_are_not_tracked() {
    let object = Shared::new(test_object());
    let tracked = track(&object).unwrap();

    let mut other = DynamicObject::new();
    tracked.forwarder("method1").unwrap().apply(&mut other, &[json!(1)]).unwrap();

    assert!(get_actions(&tracked).unwrap().is_empty());
    assert_eq!(other.value("prop1"), Some(json!(1)));
    assert_eq!(prop(&object, "prop1"), json!(1));
}

#[test]
fn plays_back_action_lists() {
    let mut object = test_object();

    play_json(&mut object, &json!([{"key": "prop1", "set": 2}, {"key": "prop2", "set": "b"}])).unwrap();
    assert_eq!(object.value("prop1"), Some(json!(2)));
    assert_eq!(object.value("prop2"), Some(json!("b")));

    play_json(
        &mut object,
        &json!([{"key": "method1", "arguments": [3]}, {"key": "method2", "arguments": ["cd"]}]),
    )
    .unwrap();
    assert_eq!(object.value("prop1"), Some(json!(5)));
    assert_eq!(object.value("prop2"), Some(json!("bcd")));
}

#[test]
fn recorded_scenario_replays_to_the_same_state() {
    let object = Shared::new(test_object());
    let tracked = track(&object).unwrap();

    tracked.set("prop1", 2).unwrap();
    tracked.set("prop2", "b").unwrap();
    tracked.call("method1", &[json!(1)]).unwrap();

    assert_eq!(prop(&object, "prop1"), json!(3));
    assert_eq!(prop(&object, "prop2"), json!("b"));

    let wire = serde_json::to_string(&get_actions(&tracked).unwrap()).unwrap();
    assert_eq!(
        wire,
        r#"[{"key":"prop1","set":2},{"key":"prop2","set":"b"},{"key":"method1","arguments":[1]}]"#
    );

    let actions: Vec<Action> = serde_json::from_str(&wire).unwrap();
    let mut fresh = test_object();
    play(&mut fresh, &actions).unwrap();
    assert_eq!(fresh.to_value(), object.read(|o| o.to_value()).unwrap());
}

#[test]
fn last_action_matches_each_write() {
    let object = Shared::new(test_object());
    let tracked = track(&object).unwrap();

    for v in [json!(7), json!(null), json!([1, 2]), json!({"nested": true})] {
        tracked.set("prop1", v.clone()).unwrap();
        assert_eq!(prop(&object, "prop1"), v);
        assert_eq!(get_actions(&tracked).unwrap().last(), Some(Action::assign("prop1", v)));
    }
}

#[test]
fn tracked_calls_match_direct_calls() {
    let direct = Shared::new(test_object());
    let object = Shared::new(test_object());
    let tracked = track(&object).unwrap();

    let args = [json!(5), json!("ignored")];
    direct.write(|o| o.invoke("method1", &args)).unwrap().unwrap();
    tracked.call("method1", &args).unwrap();

    assert_eq!(object.snapshot().unwrap().to_value(), direct.snapshot().unwrap().to_value());
    assert_eq!(
        get_actions(&tracked).unwrap().last(),
        Some(Action::invoke("method1", args.to_vec()))
    );
}

#[test]
fn replay_through_a_tracker_records_again() {
    let source = Shared::new(test_object());
    let first = track(&source).unwrap();
    first.set("prop2", "z").unwrap();
    first.call("method1", &[json!(10)]).unwrap();

    let target = Shared::new(test_object());
    let mut second = track(&target).unwrap();
    play(&mut second, &first.actions().snapshot()).unwrap();

    assert_eq!(second.actions().snapshot(), first.actions().snapshot());
    assert_eq!(prop(&target, "prop1"), json!(11));
    assert_eq!(prop(&target, "prop2"), json!("z"));
}

#[test]
fn invalid_inputs_are_rejected_without_side_effects() {
    assert!(track(&Shared::new(Value::Null)).unwrap_err().is_invalid_argument());
    assert!(track(&Shared::new(json!(42))).unwrap_err().is_invalid_argument());
    assert!(get_actions(&json!({})).unwrap_err().is_invalid_argument());

    let mut null = Value::Null;
    assert!(play_json(&mut null, &json!([])).unwrap_err().is_invalid_argument());
    assert_eq!(null, Value::Null);

    let mut empty = json!({});
    assert!(play_json(&mut empty, &Value::Null).unwrap_err().is_invalid_argument());
    assert_eq!(empty, json!({}));
}

#[test]
fn objects_without_members_track_nothing() {
    let object = Shared::new(DynamicObject::new());
    let tracked = track(&object).unwrap();
    assert!(tracked.members().is_empty());
    assert!(tracked.set("anything", 1).is_err());
    assert!(tracked.actions().is_empty());
}
