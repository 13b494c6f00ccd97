use super::*;
use cls_common::ClsConfig;
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn receiver(this: &Value) -> Result<ObjectId, ClsError> {
    this.as_object().ok_or(ClsError::native("receiver must be an object"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn person(realm: &mut Realm) -> ObjectId {
    realm
        .create_class(
            ClassDescriptor::new()
                .named("Person")
                .constructor(|realm, this, args| {
                    let this = receiver(&this)?;
                    realm.set(this, "name", arg(args, 0));
                    realm.set(this, "age", arg(args, 1));
                    Ok(Value::Undefined)
                })
                .method("describe", |realm, this, _| {
                    let this = receiver(&this)?;
                    let name = realm.get(this, "name")?;
                    let age = realm.get(this, "age")?;
                    Ok(Value::Object(
                        realm.object_from_entries([("name", name), ("age", age)]),
                    ))
                })
                .static_value("species", "human"),
        )
        .unwrap()
}

fn student(realm: &mut Realm, parent: ObjectId) -> ObjectId {
    realm
        .create_class(
            ClassDescriptor::new()
                .named("Student")
                .extends(parent)
                .method("read", |_, _, args| {
                    Ok(Value::str(format!("reading {}", arg(args, 0))))
                }),
        )
        .unwrap()
}

#[test]
fn test_empty_descriptor_builds_usable_class() {
    let mut realm = Realm::new();
    let class = realm.create_class(ClassDescriptor::new()).unwrap();

    let instance = realm.construct(class, &[]).unwrap();
    let instance = Value::Object(instance);

    assert!(realm.instance_of(&instance, class).unwrap());
    assert!(realm.is_callable(&realm.get_value(&instance, CALL_SUPER).unwrap()));
    assert_eq!(realm.uber(class), None);
    assert_eq!(realm.to_json(&instance).unwrap(), json!({}));
}

#[test]
fn test_prototype_constructor_points_at_class() {
    let mut realm = Realm::new();
    let person = person(&mut realm);
    let prototype = realm.prototype_object(person).unwrap();

    assert_eq!(realm.get_own(prototype, CONSTRUCTOR), Some(&Value::Object(person)));
    assert_eq!(realm.function_name(person), Some("Person"));
}

#[test]
fn test_derived_class_inherits_behavior() {
    init_tracing();
    let mut realm = Realm::new();
    let person = person(&mut realm);
    let student = student(&mut realm, person);

    let ada = Value::Object(realm.construct(student, &["Ada".into(), 30.into()]).unwrap());

    let described = realm.call_method(&ada, "describe", &[]).unwrap();
    assert_eq!(realm.to_json(&described).unwrap(), json!({"name": "Ada", "age": 30}));
    let reading = realm.call_method(&ada, "read", &["X".into()]).unwrap();
    assert_eq!(reading, Value::from("reading X"));

    assert!(realm.instance_of(&ada, student).unwrap());
    assert!(realm.instance_of(&ada, person).unwrap());
    assert_eq!(realm.uber(student), Some(realm.prototype_object(person).unwrap()));
}

#[test]
fn test_parent_never_sees_child_members() {
    let mut realm = Realm::new();
    let person = person(&mut realm);
    let _student = student(&mut realm, person);

    let plain = Value::Object(realm.construct(person, &["Bob".into(), 40.into()]).unwrap());
    let error = realm.call_method(&plain, "read", &[]).unwrap_err();
    assert_eq!(error.to_string(), "read is not a function");
}

#[test]
fn test_statics_are_copied_at_creation() {
    let mut realm = Realm::new();
    let person = person(&mut realm);
    let student = student(&mut realm, person);
    realm.set(person, "late", true);

    assert_eq!(realm.get(student, "species").unwrap(), Value::from("human"));
    assert_eq!(realm.get(student, "late").unwrap(), Value::Undefined);
}

#[test]
fn test_siblings_are_isolated() {
    let mut realm = Realm::new();
    let person = person(&mut realm);
    let left = realm
        .create_class(ClassDescriptor::new().extends(person).method("only", |_, _, _| Ok(1.into())))
        .unwrap();
    let right = realm.create_class(ClassDescriptor::new().extends(person)).unwrap();

    let on_right = Value::Object(realm.construct(right, &[]).unwrap());
    assert!(realm.call_method(&on_right, "only", &[]).is_err());
    let on_left = Value::Object(realm.construct(left, &[]).unwrap());
    assert_eq!(realm.call_method(&on_left, "only", &[]).unwrap(), Value::from(1));
    assert!(!realm.instance_of(&on_left, right).unwrap());
}

#[test]
fn test_default_initializer_delegates_to_parent() {
    let mut realm = Realm::new();
    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    let base = realm
        .create_class(ClassDescriptor::new().constructor(move |realm, this, args| {
            counter.set(counter.get() + 1);
            realm.set(receiver(&this)?, "tag", arg(args, 0));
            Ok(Value::Undefined)
        }))
        .unwrap();
    let middle = realm.create_class(ClassDescriptor::new().extends(base)).unwrap();
    let leaf = realm.create_class(ClassDescriptor::new().extends(middle)).unwrap();

    let instance = realm.construct(leaf, &["leaf".into()]).unwrap();

    assert_eq!(runs.get(), 1);
    assert_eq!(realm.get(instance, "tag").unwrap(), Value::from("leaf"));
}

#[test]
fn test_delegation_resolves_parent_at_call_time() {
    let mut realm = Realm::new();
    let base = realm.create_class(ClassDescriptor::new()).unwrap();
    let child = realm.create_class(ClassDescriptor::new().extends(base)).unwrap();

    // Swap the constructor seen through `uber` after creation.
    let uber = realm.uber(child).unwrap();
    let replacement = realm.native_function("Replacement", |realm, this, _| {
        realm.set(receiver(&this)?, "replaced", true);
        Ok(Value::Undefined)
    });
    realm.set(uber, CONSTRUCTOR, replacement);

    let instance = realm.construct(child, &[]).unwrap();
    assert_eq!(realm.get(instance, "replaced").unwrap(), Value::from(true));
}

#[test]
fn test_constructor_runs_once_per_construction() {
    let mut realm = Realm::new();
    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    let class = realm
        .create_class(ClassDescriptor::new().constructor(move |_, _, _| {
            counter.set(counter.get() + 1);
            Ok(Value::Undefined)
        }))
        .unwrap();

    assert_eq!(runs.get(), 0);
    realm.construct(class, &[]).unwrap();
    assert_eq!(runs.get(), 1);
}

#[test]
fn test_call_super_constructor_runs_parent_first() {
    init_tracing();
    let mut realm = Realm::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let parent_log = Rc::clone(&log);
    let parent = realm
        .create_class(ClassDescriptor::new().constructor(move |realm, this, args| {
            parent_log.borrow_mut().push("parent");
            realm.set(receiver(&this)?, "name", arg(args, 0));
            Ok(Value::Undefined)
        }))
        .unwrap();

    let child_log = Rc::clone(&log);
    let child = realm
        .create_class(ClassDescriptor::new().extends(parent).constructor(move |realm, this, args| {
            realm.call_super(&this, CONSTRUCTOR, args)?;
            child_log.borrow_mut().push("child");
            realm.set(receiver(&this)?, "job", "engineer");
            Ok(Value::Undefined)
        }))
        .unwrap();

    let worker = realm.construct(child, &["Grace".into()]).unwrap();

    assert_eq!(*log.borrow(), vec!["parent", "child"]);
    assert_eq!(
        realm.to_json(&Value::Object(worker)).unwrap(),
        json!({"name": "Grace", "job": "engineer"})
    );
}

#[test]
fn test_call_super_method_gets_child_receiver() {
    let mut realm = Realm::new();
    let parent = realm
        .create_class(ClassDescriptor::new().method("greet", |realm, this, args| {
            let name = realm.get(receiver(&this)?, "name")?;
            Ok(Value::str(format!("{} greets {}", name, arg(args, 0))))
        }))
        .unwrap();
    let child = realm
        .create_class(ClassDescriptor::new().extends(parent).method("greet", |realm, this, args| {
            let base = realm.call_super(&this, "greet", args)?;
            Ok(Value::str(format!("{base}!")))
        }))
        .unwrap();

    let instance = realm.construct(child, &[]).unwrap();
    realm.set(instance, "name", "Kid");
    let greeting = realm
        .call_method(&Value::Object(instance), "greet", &["Mom".into()])
        .unwrap();

    assert_eq!(greeting, Value::from("Kid greets Mom!"));
}

#[test]
fn test_missing_super_method_is_null() {
    let mut realm = Realm::new();
    let root = realm.create_class(ClassDescriptor::new()).unwrap();
    let child = realm.create_class(ClassDescriptor::new().extends(root)).unwrap();

    for class in [root, child] {
        let instance = Value::Object(realm.construct(class, &[]).unwrap());
        let before = realm.own_keys(instance.as_object().unwrap());
        assert_eq!(realm.call_super(&instance, "doesNotExist", &[]).unwrap(), Value::Null);
        assert_eq!(realm.own_keys(instance.as_object().unwrap()), before);
    }
}

#[test]
fn test_call_super_argument_list_shapes() {
    let mut realm = Realm::new();
    let parent = realm
        .create_class(ClassDescriptor::new().method("count", |_, _, args| Ok((args.len() as f64).into())))
        .unwrap();
    let child = realm.create_class(ClassDescriptor::new().extends(parent)).unwrap();
    let instance = Value::Object(realm.construct(child, &[]).unwrap());
    let name = Value::from("count");

    let array = Value::array([1.into(), 2.into(), 3.into()]);
    let plain = Value::Object(realm.new_object());
    for (list, expected) in [(array, 3), (Value::Undefined, 0), (Value::Null, 0), (plain, 0)] {
        let result = realm
            .call_method(&instance, CALL_SUPER, &[name.clone(), list])
            .unwrap();
        assert_eq!(result, Value::from(expected));
    }

    let error = realm
        .call_method(&instance, CALL_SUPER, &[name, 7.into()])
        .unwrap_err();
    assert_eq!(error, ClsError::NotAnObject { found: "number" });
}

#[test]
fn test_runaway_super_recursion_is_bounded() {
    let mut realm = Realm::with_config(ClsConfig {
        max_call_depth: 32,
        ..ClsConfig::default()
    });
    let base = realm
        .create_class(ClassDescriptor::new().method("step", |_, _, _| Ok("base".into())))
        .unwrap();
    let middle = realm
        .create_class(ClassDescriptor::new().extends(base).method("step", |realm, this, _| {
            realm.call_super(&this, "step", &[])
        }))
        .unwrap();
    // A grandchild receiver resolves `callSuper("step")` through its own
    // class's `uber`, which lands on `middle.step` again.
    let leaf = realm.create_class(ClassDescriptor::new().extends(middle)).unwrap();

    let instance = Value::Object(realm.construct(leaf, &[]).unwrap());
    let error = realm.call_method(&instance, "step", &[]).unwrap_err();
    assert_eq!(
        error,
        ClsError::RecursionLimit {
            kind: "call stack",
            limit: 32
        }
    );
}

#[test]
fn test_non_function_constructor_is_rejected() {
    let mut realm = Realm::new();
    let error = realm
        .create_class(ClassDescriptor::new().member(CONSTRUCTOR, Value::from(5)))
        .unwrap_err();
    assert_eq!(error, ClsError::InvalidConstructor { found: "number" });
}

#[test]
fn test_existing_function_becomes_the_class() {
    let mut realm = Realm::new();
    let existing = realm.native_function("Existing", |realm, this, _| {
        realm.set(receiver(&this)?, "made", true);
        Ok(Value::Undefined)
    });
    let class = realm
        .create_class(ClassDescriptor::new().member(CONSTRUCTOR, Value::Object(existing)))
        .unwrap();

    assert_eq!(class, existing);
    let instance = realm.construct(class, &[]).unwrap();
    assert_eq!(realm.get(instance, "made").unwrap(), Value::from(true));
}

#[test]
fn test_value_members_are_shared_by_instances() {
    let mut realm = Realm::new();
    let class = realm
        .create_class(ClassDescriptor::new().member("kind", Value::from("shared")))
        .unwrap();
    let first = realm.construct(class, &[]).unwrap();
    let second = realm.construct(class, &[]).unwrap();

    assert!(!realm.has_own(first, "kind"));
    assert_eq!(realm.get(first, "kind").unwrap(), realm.get(second, "kind").unwrap());
}

#[test]
fn test_create_class_from_object() {
    let mut realm = Realm::new();
    let parent = person(&mut realm);
    let hello = realm.native_function("hello", |_, _, _| Ok("hello".into()));
    let methods = realm.object_from_entries([("hello", hello)]);
    let statics = realm.object_from_entries([("kind", "dynamic")]);
    let options = realm.object_from_entries([
        (PARENT_CLASS, Value::Object(parent)),
        (INSTANCE_MEMBERS, Value::Object(methods)),
        (STATIC_MEMBERS, Value::Object(statics)),
    ]);

    let class = realm.create_class_from_object(Some(options)).unwrap();
    let instance = Value::Object(realm.construct(class, &["Lin".into(), 9.into()]).unwrap());

    assert_eq!(realm.call_method(&instance, "hello", &[]).unwrap(), Value::from("hello"));
    assert_eq!(realm.get_value(&instance, "name").unwrap(), Value::from("Lin"));
    assert_eq!(realm.get(class, "kind").unwrap(), Value::from("dynamic"));
    assert_eq!(realm.get(class, "species").unwrap(), Value::from("human"));
    assert!(realm.instance_of(&instance, parent).unwrap());
}

#[test]
fn test_create_class_from_object_edge_cases() {
    let mut realm = Realm::new();

    let bare = realm.create_class_from_object(None).unwrap();
    assert!(realm.object(bare).is_callable());

    let falsy_parent = realm.object_from_entries([(PARENT_CLASS, Value::Null)]);
    let class = realm.create_class_from_object(Some(falsy_parent)).unwrap();
    assert_eq!(realm.uber(class), None);

    let bad_parent = realm.object_from_entries([(PARENT_CLASS, "Person")]);
    assert_eq!(
        realm.create_class_from_object(Some(bad_parent)).unwrap_err(),
        ClsError::NotAnObject { found: "string" }
    );

    let methods = realm.object_from_entries([(CONSTRUCTOR, true)]);
    let bad_constructor = realm.object_from_entries([(INSTANCE_MEMBERS, methods)]);
    assert_eq!(
        realm.create_class_from_object(Some(bad_constructor)).unwrap_err(),
        ClsError::InvalidConstructor { found: "boolean" }
    );
}

#[test]
fn test_forwarded_args() {
    let forwarded = forwarded_args(&Value::array(["a".into(), "b".into()])).unwrap();
    assert_eq!(forwarded.as_slice(), &[Value::from("a"), Value::from("b")]);
    assert!(forwarded_args(&Value::Undefined).unwrap().is_empty());
    assert!(forwarded_args(&Value::from(true)).is_err());
}

#[test]
fn test_foreign_parent_is_an_error() {
    let mut realm = Realm::new();
    let unknown = ClsError::NotAnObject {
        found: "unknown object id",
    };

    let error = realm
        .create_class(ClassDescriptor::new().extends(ObjectId(999)))
        .unwrap_err();
    assert_eq!(error, unknown);

    let options = realm.object_from_entries([(PARENT_CLASS, ObjectId(999))]);
    assert_eq!(realm.create_class_from_object(Some(options)).unwrap_err(), unknown);
    assert_eq!(realm.create_class_from_object(Some(ObjectId(998))).unwrap_err(), unknown);
}
