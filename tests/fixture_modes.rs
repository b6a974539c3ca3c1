use fixture_forge::fixture_core::{
    ConfigOverrides, Constraint, FieldDescriptor, Fixture, FixtureType, FixtureValue,
    GenerationConfig, StringFormat, TypeDescriptor, TypeRegistry,
};
use fixture_forge::fixture_generator::{
    create_anti_expected, create_default_value, create_expected, FixtureFactory, GenerationError,
    InjectType, UnsupportedReason,
};
use regex::Regex;
use std::sync::Arc;
use std::thread;

const RUNS: u64 = 50;

fn seeded(seed: u64) -> GenerationConfig {
    GenerationConfig::default().with_seed(seed)
}

fn single_field_registry(field: FieldDescriptor) -> TypeRegistry {
    let registry = TypeRegistry::new();
    registry.insert(TypeDescriptor::new("Subject").field(field));
    registry
}

fn field_of(value: &FixtureValue, name: &str) -> FixtureValue {
    value.field(name).cloned().unwrap_or(FixtureValue::Null)
}

#[test]
fn test_age_range_expected_and_anti_expected() {
    let registry = single_field_registry(
        FieldDescriptor::new("age", FixtureType::Int32)
            .with(Constraint::Min { value: 1 })
            .with(Constraint::Max { value: 100 }),
    );

    for seed in 0..RUNS {
        let valid = create_expected(&registry, "Subject", Some(&seeded(seed))).unwrap();
        let age = field_of(&valid, "age").as_i64().unwrap();
        assert!((1..=100).contains(&age), "expected age {age}");

        let invalid = create_anti_expected(&registry, "Subject", Some(&seeded(seed))).unwrap();
        let age = field_of(&invalid, "age").as_i64().unwrap();
        assert!(!(1..=100).contains(&age), "anti-expected age {age}");
    }
}

#[test]
fn test_mutual_recursion_is_cut_in_every_mode() {
    let registry = TypeRegistry::new();
    registry.insert(
        TypeDescriptor::new("A")
            .field(FieldDescriptor::new("name", FixtureType::String))
            .field(FieldDescriptor::new("b", FixtureType::object("B"))),
    );
    registry.insert(
        TypeDescriptor::new("B")
            .field(FieldDescriptor::new("count", FixtureType::Int32))
            .field(FieldDescriptor::new("a", FixtureType::object("A"))),
    );

    for mode in InjectType::ALL {
        let config = seeded(1);
        let a = match mode {
            InjectType::Expected => create_expected(&registry, "A", Some(&config)),
            InjectType::AntiExpected => create_anti_expected(&registry, "A", Some(&config)),
            InjectType::DefaultValue => create_default_value(&registry, "A", Some(&config)),
        }
        .unwrap();

        let b = field_of(&a, "b");
        assert!(b.as_object().is_some(), "{mode}: A.b must be populated");
        assert_eq!(field_of(&b, "a"), FixtureValue::Null, "{mode}: A.b.a must be cut");
    }
}

#[test]
fn test_email_format() {
    let shape = Regex::new(r"^[^@]+@[^@]+\.[^@]+$").unwrap();
    let registry = single_field_registry(
        FieldDescriptor::new("email", FixtureType::String).with(Constraint::Email),
    );
    let formatted = single_field_registry(
        FieldDescriptor::new("email", FixtureType::String).with_format(StringFormat::Email),
    );

    for seed in 0..RUNS {
        for registry in [&registry, &formatted] {
            let valid = create_expected(registry, "Subject", Some(&seeded(seed))).unwrap();
            let email = field_of(&valid, "email");
            assert!(shape.is_match(email.as_str().unwrap()), "{email:?}");
        }

        let invalid = create_anti_expected(&registry, "Subject", Some(&seeded(seed))).unwrap();
        let email = field_of(&invalid, "email");
        assert!(!shape.is_match(email.as_str().unwrap()), "{email:?}");
    }
}

#[test]
fn test_assert_true() {
    let registry = single_field_registry(
        FieldDescriptor::new("accepted", FixtureType::Bool).with(Constraint::AssertTrue),
    );
    for seed in 0..RUNS {
        let valid = create_expected(&registry, "Subject", Some(&seeded(seed))).unwrap();
        assert_eq!(field_of(&valid, "accepted"), FixtureValue::Bool(true));

        let invalid = create_anti_expected(&registry, "Subject", Some(&seeded(seed))).unwrap();
        assert_eq!(field_of(&invalid, "accepted"), FixtureValue::Bool(false));
    }
}

#[test]
fn test_collection_size() {
    let registry = single_field_registry(
        FieldDescriptor::new("tags", FixtureType::list(FixtureType::String))
            .with(Constraint::size(2, 5)),
    );
    for seed in 0..RUNS {
        let valid = create_expected(&registry, "Subject", Some(&seeded(seed))).unwrap();
        let len = field_of(&valid, "tags").len().unwrap();
        assert!((2..=5).contains(&len), "expected {len} tags");

        let invalid = create_anti_expected(&registry, "Subject", Some(&seeded(seed))).unwrap();
        let len = field_of(&invalid, "tags").len().unwrap();
        assert!(!(2..=5).contains(&len), "anti-expected {len} tags");
    }
}

#[test]
fn test_pattern_field() {
    let pattern = Regex::new(r"^[A-Z]{3}-\d{4}$").unwrap();
    let registry = single_field_registry(
        FieldDescriptor::new("code", FixtureType::String)
            .with(Constraint::pattern(r"[A-Z]{3}-\d{4}")),
    );
    for seed in 0..RUNS {
        let valid = create_expected(&registry, "Subject", Some(&seeded(seed))).unwrap();
        let code = field_of(&valid, "code");
        assert!(pattern.is_match(code.as_str().unwrap()), "{code:?}");

        let invalid = create_anti_expected(&registry, "Subject", Some(&seeded(seed))).unwrap();
        let code = field_of(&invalid, "code");
        assert!(!pattern.is_match(code.as_str().unwrap()), "{code:?}");
    }
}

#[test]
fn test_float_bounds() {
    let registry = single_field_registry(
        FieldDescriptor::new("ratio", FixtureType::Float64)
            .with(Constraint::DecimalMin {
                value: 0.0,
                inclusive: false,
            })
            .with(Constraint::DecimalMax {
                value: 1.0,
                inclusive: true,
            }),
    );
    for seed in 0..RUNS {
        let valid = create_expected(&registry, "Subject", Some(&seeded(seed))).unwrap();
        let ratio = field_of(&valid, "ratio").as_f64().unwrap();
        assert!(ratio > 0.0 && ratio <= 1.0, "expected {ratio}");

        let invalid = create_anti_expected(&registry, "Subject", Some(&seeded(seed))).unwrap();
        let ratio = field_of(&invalid, "ratio").as_f64().unwrap();
        assert!(ratio <= 0.0 || ratio > 1.0, "anti-expected {ratio}");
    }
}

#[test]
fn test_not_null_violation_yields_null() {
    let registry = single_field_registry(
        FieldDescriptor::nullable("id", FixtureType::Uuid).with(Constraint::NotNull),
    );
    for seed in 0..RUNS {
        let valid = create_expected(&registry, "Subject", Some(&seeded(seed))).unwrap();
        assert!(!field_of(&valid, "id").is_null());

        let invalid = create_anti_expected(&registry, "Subject", Some(&seeded(seed))).unwrap();
        assert!(field_of(&invalid, "id").is_null());
    }
}

#[test]
fn test_temporal_direction() {
    let registry = single_field_registry(
        FieldDescriptor::new("born", FixtureType::DateTime).with(Constraint::Past),
    );
    let now = chrono::Utc::now();
    let valid = create_expected(&registry, "Subject", Some(&seeded(3))).unwrap();
    assert!(*field_of(&valid, "born").as_datetime().unwrap() < now);

    let invalid = create_anti_expected(&registry, "Subject", Some(&seeded(3))).unwrap();
    assert!(*field_of(&invalid, "born").as_datetime().unwrap() > now);
}

#[test]
fn test_default_value_zeros_and_depth() {
    let registry = TypeRegistry::new();
    registry.insert(
        TypeDescriptor::new("Root")
            .field(FieldDescriptor::new("count", FixtureType::Int64).with(Constraint::Min { value: 5 }))
            .field(FieldDescriptor::new("ratio", FixtureType::Float32))
            .field(FieldDescriptor::new("flag", FixtureType::Bool))
            .field(FieldDescriptor::new("label", FixtureType::String))
            .field(FieldDescriptor::nullable("note", FixtureType::String))
            .field(FieldDescriptor::new("items", FixtureType::list(FixtureType::Int32)))
            .field(FieldDescriptor::new("child", FixtureType::object("Child"))),
    );
    registry.insert(
        TypeDescriptor::new("Child")
            .field(FieldDescriptor::new("value", FixtureType::Int32))
            .field(FieldDescriptor::new("grandchild", FixtureType::object("Grandchild"))),
    );
    registry.insert(TypeDescriptor::new("Grandchild").field(FieldDescriptor::new("x", FixtureType::Int32)));

    let root = create_default_value(&registry, "Root", None).unwrap();
    assert_eq!(field_of(&root, "count"), FixtureValue::Int(0));
    assert_eq!(field_of(&root, "ratio"), FixtureValue::Float(0.0));
    assert_eq!(field_of(&root, "flag"), FixtureValue::Bool(false));
    assert_eq!(field_of(&root, "label"), FixtureValue::String(String::new()));
    assert_eq!(field_of(&root, "note"), FixtureValue::Null);
    assert_eq!(field_of(&root, "items"), FixtureValue::Array(Vec::new()));

    let child = field_of(&root, "child");
    assert_eq!(field_of(&child, "value"), FixtureValue::Int(0));
    assert_eq!(field_of(&child, "grandchild"), FixtureValue::Null);

    let deeper = GenerationConfig::default().with_default_value_depth(2);
    let root = create_default_value(&registry, "Root", Some(&deeper)).unwrap();
    let grandchild = field_of(&field_of(&root, "child"), "grandchild");
    assert_eq!(field_of(&grandchild, "x"), FixtureValue::Int(0));
}

#[test]
fn test_max_depth_limits_chains() {
    let registry = TypeRegistry::new();
    for (name, next) in [("L1", "L2"), ("L2", "L3"), ("L3", "L4")] {
        registry.insert(
            TypeDescriptor::new(name)
                .field(FieldDescriptor::new("id", FixtureType::Int32))
                .field(FieldDescriptor::new("next", FixtureType::object(next))),
        );
    }
    registry.insert(TypeDescriptor::new("L4").field(FieldDescriptor::new("id", FixtureType::Int32)));

    let config = seeded(9).with_max_depth(2);
    let l1 = create_expected(&registry, "L1", Some(&config)).unwrap();
    let l2 = field_of(&l1, "next");
    assert!(l2.as_object().is_some());
    assert_eq!(field_of(&l2, "next"), FixtureValue::Null);
}

#[test]
fn test_same_seed_same_fixture() {
    let registry = TypeRegistry::new();
    registry.insert(
        TypeDescriptor::new("Order")
            .field(FieldDescriptor::new("id", FixtureType::Uuid))
            .field(FieldDescriptor::new("quantity", FixtureType::Int16).with(Constraint::Positive))
            .field(FieldDescriptor::new("sku", FixtureType::String).with(Constraint::pattern("[A-Z]{2}[0-9]{3}")))
            .field(FieldDescriptor::new(
                "notes",
                FixtureType::map(FixtureType::String, FixtureType::Float64),
            )),
    );

    for mode in InjectType::ALL {
        let first = match mode {
            InjectType::Expected => create_expected(&registry, "Order", Some(&seeded(77))),
            InjectType::AntiExpected => create_anti_expected(&registry, "Order", Some(&seeded(77))),
            InjectType::DefaultValue => create_default_value(&registry, "Order", Some(&seeded(77))),
        }
        .unwrap();
        let second = match mode {
            InjectType::Expected => create_expected(&registry, "Order", Some(&seeded(77))),
            InjectType::AntiExpected => create_anti_expected(&registry, "Order", Some(&seeded(77))),
            InjectType::DefaultValue => create_default_value(&registry, "Order", Some(&seeded(77))),
        }
        .unwrap();
        assert_eq!(first, second, "{mode}");
    }

    let a = create_expected(&registry, "Order", Some(&seeded(1))).unwrap();
    let b = create_expected(&registry, "Order", Some(&seeded(2))).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_opaque_field_is_unsupported() {
    let registry = single_field_registry(FieldDescriptor::new("conn", FixtureType::opaque("Socket")));
    let err = create_expected(&registry, "Subject", None).unwrap_err();
    match err {
        GenerationError::UnsupportedType {
            type_name,
            field,
            reason,
        } => {
            assert_eq!(type_name, "Socket");
            assert_eq!(field, "Subject.conn");
            assert_eq!(reason, UnsupportedReason::Opaque);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unsatisfiable_violation_is_reported() {
    let registry = single_field_registry(
        FieldDescriptor::new("small", FixtureType::Int8)
            .with(Constraint::Min { value: -128 })
            .with(Constraint::Max { value: 127 }),
    );
    let err = create_anti_expected(&registry, "Subject", Some(&seeded(1))).unwrap_err();
    assert!(matches!(
        err,
        GenerationError::UnsupportedType {
            reason: UnsupportedReason::RetryExhausted { .. },
            ..
        }
    ));
}

#[test]
fn test_invalid_config_is_rejected() {
    let registry = single_field_registry(FieldDescriptor::new("n", FixtureType::Int32));
    let config = GenerationConfig::default().with_null_probability(1.5);
    assert!(matches!(
        create_expected(&registry, "Subject", Some(&config)),
        Err(GenerationError::Config(_))
    ));
}

#[test]
fn test_config_derivation_keeps_original() {
    let base = GenerationConfig::default();
    let derived = base.with_overrides(&ConfigOverrides {
        max_collection_size: Some(2),
        string_max_length: Some(4),
        ..Default::default()
    });
    let sibling = base.with_collection_size(7, 9);

    assert_eq!(base, GenerationConfig::default());
    assert_eq!(derived.max_collection_size, 2);
    assert_eq!(derived.string_max_length, 4);
    assert_eq!(sibling.max_collection_size, 9);
    assert_eq!(sibling.string_max_length, base.string_max_length);
}

#[test]
fn test_null_probability_one_nulls_optional_fields() {
    let registry = TypeRegistry::new();
    registry.insert(
        TypeDescriptor::new("Profile")
            .field(FieldDescriptor::nullable("bio", FixtureType::String))
            .field(FieldDescriptor::new("handle", FixtureType::String)),
    );
    let config = seeded(5).with_null_probability(1.0);
    let profile = create_expected(&registry, "Profile", Some(&config)).unwrap();
    assert!(field_of(&profile, "bio").is_null());
    assert!(!field_of(&profile, "handle").is_null());
}

#[test]
fn test_set_elements_are_distinct() {
    let registry = single_field_registry(
        FieldDescriptor::new("codes", FixtureType::set(FixtureType::Int8)).with(Constraint::size(5, 10)),
    );
    for seed in 0..RUNS {
        let value = create_expected(&registry, "Subject", Some(&seeded(seed))).unwrap();
        let codes = field_of(&value, "codes");
        let items = codes.as_array().unwrap();
        let mut keys: Vec<String> = items.iter().map(FixtureValue::key_string).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), items.len());
    }
}

#[derive(Debug, serde::Deserialize)]
struct Account {
    login: String,
    age: i32,
    active: bool,
    address: Option<Address>,
}

#[derive(Debug, serde::Deserialize)]
struct Address {
    city: String,
    owner: Option<Box<Account>>,
}

impl Fixture for Account {
    fn type_name() -> &'static str {
        "Account"
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("Account")
            .field(
                FieldDescriptor::new("login", FixtureType::String)
                    .with(Constraint::NotBlank)
                    .with(Constraint::size(3, 12)),
            )
            .field(
                FieldDescriptor::new("age", FixtureType::Int32)
                    .with(Constraint::Min { value: 18 })
                    .with(Constraint::Max { value: 99 }),
            )
            .field(FieldDescriptor::new("active", FixtureType::Bool).with(Constraint::AssertTrue))
            .field(FieldDescriptor::nullable("address", FixtureType::object("Address")))
    }

    fn register_dependencies(registry: &TypeRegistry) {
        registry.register::<Address>();
    }
}

impl Fixture for Address {
    fn type_name() -> &'static str {
        "Address"
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("Address")
            .field(FieldDescriptor::new("city", FixtureType::String).with(Constraint::NotEmpty))
            .field(FieldDescriptor::nullable("owner", FixtureType::object("Account")))
    }

    fn register_dependencies(registry: &TypeRegistry) {
        registry.register::<Account>();
    }
}

#[test]
fn test_typed_fixtures() {
    let factory = FixtureFactory::default().with_config(seeded(11));

    let account: Account = factory.expected().unwrap();
    assert!((3..=12).contains(&account.login.chars().count()));
    assert!((18..=99).contains(&account.age));
    assert!(account.active);
    let address = account.address.unwrap();
    assert!(!address.city.is_empty());
    assert!(address.owner.is_none());

    let zero: Account = factory.default_value().unwrap();
    assert_eq!(zero.age, 0);
    assert!(!zero.active);
    assert_eq!(zero.login, "");

    let invalid = factory.anti_expected::<Account>().unwrap();
    assert!(invalid.as_object().is_some());
}

#[test]
fn test_concurrent_generation_shares_registry() {
    let factory = Arc::new(FixtureFactory::default());
    factory.registry().register::<Account>();

    let handles: Vec<_> = (0..8u64)
        .map(|i| {
            let factory = Arc::clone(&factory);
            thread::spawn(move || {
                let config = seeded(i);
                factory.create_with("Account", InjectType::Expected, &config)
            })
        })
        .collect();

    for handle in handles {
        let account = handle.join().unwrap().unwrap();
        let age = field_of(&account, "age").as_i64().unwrap();
        assert!((18..=99).contains(&age));
    }
    assert_eq!(factory.registry().len(), 2);
}
