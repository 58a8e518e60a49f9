use fx_adapter::{
    Access, Adapter, AdapterConfig, AdapterError, Object, Returned, Status, Target, UnknownError,
    ESCAPE_HATCH,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn widget() -> Object {
    Object::new()
        .with_property("label", "widget")
        .with_property("size", 3)
        .with_method("describe", |this, _| {
            let label = this.property("label").unwrap_or(Value::Null);
            Ok(Returned::ready(json!({ "label": label })))
        })
        .with_method("grow", |this, args| {
            let by = args.first().and_then(Value::as_u64).unwrap_or(1);
            let size = this.property("size").and_then(|v| v.as_u64()).unwrap_or(0);
            this.set_property("size", size + by);
            Ok(Returned::ready(size + by))
        })
}

fn wrap(obj: Object) -> Adapter<Object, UnknownError> {
    Adapter::new(obj, AdapterConfig::default())
}

#[test]
fn properties_pass_through_live() {
    let adapter = wrap(widget());
    assert_eq!(adapter.property("label").unwrap(), json!("widget"));

    adapter.unsafe_target().set_property("label", "gadget");
    assert_eq!(adapter.property("label").unwrap(), json!("gadget"));
    assert_eq!(
        adapter.get("label").and_then(Access::into_property),
        adapter.unsafe_target().property("label")
    );
}

#[test]
fn escape_hatch_is_the_target() {
    let target = Arc::new(widget());
    let adapter: Adapter<Object, UnknownError> =
        Adapter::from_arc(Arc::clone(&target), AdapterConfig::default());
    match adapter.get(ESCAPE_HATCH) {
        Some(Access::Target(t)) => assert!(Arc::ptr_eq(&t, &target)),
        _ => panic!("escape hatch must yield the target"),
    }
    assert!(Arc::ptr_eq(adapter.unsafe_target(), &target));
}

#[test]
fn escape_hatch_cannot_be_shadowed() {
    let obj = widget().with_property("unsafe", "mine");
    let adapter = wrap(obj);
    assert!(matches!(adapter.get("unsafe"), Some(Access::Target(_))));
    assert_eq!(
        adapter.keys().iter().filter(|k| k.as_str() == "unsafe").count(),
        1
    );
    // The target still holds its own value.
    assert_eq!(adapter.unsafe_target().property("unsafe"), Some(json!("mine")));
}

#[test]
fn keys_and_membership_cover_target_plus_escape_hatch() {
    let adapter = wrap(widget());
    let mut expected = adapter.unsafe_target().keys();
    expected.push("unsafe".to_string());
    assert_eq!(adapter.keys(), expected);
    for key in adapter.keys() {
        assert!(adapter.has(&key), "missing {key}");
    }
    assert!(!adapter.has("nope"));
    assert!(adapter.get("nope").is_none());
}

#[test]
fn classification_is_evaluated_on_every_read() {
    let adapter = wrap(widget());
    assert!(matches!(adapter.get("describe"), Some(Access::Method(_))));

    adapter.unsafe_target().set_property("describe", "now a string");
    assert!(matches!(
        adapter.get("describe"),
        Some(Access::Property(v)) if v == json!("now a string")
    ));

    adapter
        .unsafe_target()
        .set_method("label", |_, _| Ok(Returned::ready("callable label")));
    assert!(matches!(adapter.get("label"), Some(Access::Method(_))));

    adapter.unsafe_target().remove("size");
    assert!(adapter.get("size").is_none());
    assert!(!adapter.keys().contains(&"size".to_string()));
}

#[test]
fn lookup_errors() {
    let adapter = wrap(widget());
    assert_eq!(
        adapter.call("label", vec![]).unwrap_err(),
        AdapterError::NotCallable("label".into())
    );
    assert_eq!(
        adapter.call("missing", vec![]).unwrap_err(),
        AdapterError::MemberNotFound("missing".into())
    );
    assert_eq!(
        adapter.call("unsafe", vec![]).unwrap_err(),
        AdapterError::EscapeHatch("unsafe".into())
    );
    assert_eq!(
        adapter.property("describe").unwrap_err(),
        AdapterError::NotAProperty("describe".into())
    );
}

#[tokio::test]
async fn methods_run_against_the_target_as_receiver() {
    let adapter = wrap(widget());
    let described = adapter.call("describe", vec![]).unwrap();
    assert_eq!(described.run().await.unwrap(), json!({ "label": "widget" }));

    let grown = adapter.call("grow", vec![json!(4)]).unwrap();
    // Nothing happens until the computation is driven.
    assert_eq!(adapter.property("size").unwrap(), json!(3));
    assert_eq!(grown.status(), Status::Pending);
    assert_eq!(grown.run().await.unwrap(), json!(7));
    assert_eq!(adapter.property("size").unwrap(), json!(7));
}

#[tokio::test]
async fn wrapper_keeps_the_method_seen_at_read_time() {
    let adapter = wrap(widget());
    let describe = adapter.get("describe").and_then(Access::into_method).unwrap();
    assert_eq!(describe.name(), "describe");
    adapter.unsafe_target().remove("describe");
    let out = describe.invoke(vec![]).run().await.unwrap();
    assert_eq!(out, json!({ "label": "widget" }));
}
