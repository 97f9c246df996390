use std::collections::BTreeSet;

use error_mold::schema::{
    check_kwarg_consts, check_missing_fields, check_non_named_fields, check_undeclared_fields,
    Store, TypeHint,
};
use error_mold::{ConstructionError, DefinitionError, Value};
use indexmap::{IndexMap, IndexSet};

#[derive(Default)]
struct StoreSpec<'a> {
    fields: &'a [&'a str],
    inst_hints: &'a [&'a str],
    const_hints: &'a [&'a str],
    consts: &'a [&'a str],
    defaults: &'a [&'a str],
}

impl StoreSpec<'_> {
    fn build(&self) -> Store {
        let hints = |names: &[&str]| -> IndexMap<String, TypeHint> {
            names.iter().map(|n| (n.to_string(), TypeHint::of::<String>())).collect()
        };
        Store::new(
            self.fields.iter().map(|s| s.to_string()).collect(),
            hints(self.const_hints),
            hints(self.inst_hints),
            self.consts.iter().map(|n| (n.to_string(), Value::from("THING"))).collect(),
            self.defaults.iter().map(|s| s.to_string()).collect::<IndexSet<_>>(),
        )
    }
}

fn kws<'a>(names: &[&'a str]) -> BTreeSet<&'a str> {
    names.iter().copied().collect()
}

fn missing_ok(spec: StoreSpec<'_>, names: &[&str]) {
    check_missing_fields(&spec.build(), &kws(names)).unwrap();
}

fn missing_fails(spec: StoreSpec<'_>, names: &[&str]) {
    let err = check_missing_fields(&spec.build(), &kws(names)).unwrap_err();
    assert!(matches!(err, ConstructionError::MissingFields(_)));
}

fn undeclared_ok(spec: StoreSpec<'_>, names: &[&str]) {
    check_undeclared_fields(&spec.build(), &kws(names)).unwrap();
}

fn registered(spec: StoreSpec<'_>) -> Vec<String> {
    spec.build().registered().iter().cloned().collect()
}

#[test]
fn missing_fields_ok() {
    missing_ok(StoreSpec::default(), &[]);
    missing_ok(StoreSpec { fields: &["name", "age"], ..Default::default() }, &["name", "age"]);
    missing_ok(
        StoreSpec { fields: &["name", "age"], inst_hints: &["name", "age"], ..Default::default() },
        &["name", "age"],
    );
    missing_ok(
        StoreSpec {
            fields: &["name", "age"],
            inst_hints: &["name", "age"],
            defaults: &["age"],
            ..Default::default()
        },
        &["name"],
    );
    missing_ok(
        StoreSpec {
            fields: &["name", "age", "ENTITY"],
            inst_hints: &["name", "age"],
            defaults: &["age"],
            consts: &["ENTITY"],
            ..Default::default()
        },
        &["name"],
    );
    missing_ok(
        StoreSpec {
            fields: &["name", "age"],
            inst_hints: &["name", "age"],
            defaults: &["name", "age"],
            consts: &["ENTITY"],
            ..Default::default()
        },
        &[],
    );
    missing_ok(
        StoreSpec { fields: &["name", "ENTITY"], consts: &["ENTITY"], ..Default::default() },
        &["name"],
    );
    missing_ok(
        StoreSpec { inst_hints: &["name", "age"], defaults: &["age"], ..Default::default() },
        &["name"],
    );
}

#[test]
fn missing_fields_fail() {
    missing_fails(StoreSpec { fields: &["name", "age"], ..Default::default() }, &[]);
    missing_fails(StoreSpec { fields: &["name", "age"], ..Default::default() }, &["age"]);
    missing_fails(
        StoreSpec { fields: &["name"], inst_hints: &["name", "age"], ..Default::default() },
        &["name"],
    );
    missing_fails(
        StoreSpec { fields: &["name", "age", "ENTITY"], defaults: &["age"], ..Default::default() },
        &["name"],
    );
    missing_fails(StoreSpec { inst_hints: &["name", "age"], ..Default::default() }, &["name"]);
    missing_fails(
        StoreSpec {
            fields: &["name", "ENTITY"],
            inst_hints: &["name"],
            consts: &["ENTITY"],
            ..Default::default()
        },
        &["ENTITY"],
    );
}

#[test]
fn missing_fields_message_lists_sorted_names() {
    let store = StoreSpec { fields: &["name", "age", "ENTITY"], ..Default::default() }.build();
    let err = check_missing_fields(&store, &kws(&[])).unwrap_err();
    assert_eq!(err.to_string(), "Missing arguments: 'ENTITY', 'age', 'name'");
}

#[test]
fn undeclared_fields_ok() {
    undeclared_ok(StoreSpec::default(), &[]);
    undeclared_ok(StoreSpec { fields: &["name", "age"], ..Default::default() }, &["name", "age"]);
    undeclared_ok(
        StoreSpec { inst_hints: &["name", "age"], ..Default::default() },
        &["name", "age"],
    );
    undeclared_ok(
        StoreSpec { const_hints: &["name", "age"], ..Default::default() },
        &["name", "age"],
    );
    undeclared_ok(
        StoreSpec {
            fields: &["name", "age", "ENTITY"],
            inst_hints: &["name", "age"],
            defaults: &["age"],
            const_hints: &["ENTITY"],
            ..Default::default()
        },
        &["name"],
    );
}

#[test]
fn undeclared_fields_fail() {
    let specs = [
        StoreSpec::default(),
        StoreSpec { fields: &["name", "age"], ..Default::default() },
        StoreSpec { inst_hints: &["name", "age"], ..Default::default() },
        StoreSpec { consts: &["name", "age"], ..Default::default() },
    ];

    for spec in specs {
        let err = check_undeclared_fields(&spec.build(), &kws(&["entity"])).unwrap_err();
        assert_eq!(err.to_string(), "Undeclared arguments: 'entity'");
    }
}

#[test]
fn kwarg_consts() {
    let store = StoreSpec { const_hints: &["ENTITY"], ..Default::default() }.build();
    check_kwarg_consts(&StoreSpec::default().build(), &kws(&[])).unwrap();
    check_kwarg_consts(&store, &kws(&[])).unwrap();
    check_kwarg_consts(&store, &kws(&["name"])).unwrap();

    let err = check_kwarg_consts(&store, &kws(&["ENTITY", "name"])).unwrap_err();
    assert_eq!(err.to_string(), "Constants in arguments: 'ENTITY'");
}

#[test]
fn non_named_fields() {
    check_non_named_fields(&StoreSpec::default().build()).unwrap();
    check_non_named_fields(
        &StoreSpec { fields: &["abc", "-", "01abc"], ..Default::default() }.build(),
    )
    .unwrap();

    let empty = StoreSpec { fields: &[""], ..Default::default() }.build();
    assert_eq!(check_non_named_fields(&empty).unwrap_err(), DefinitionError::EmptyFieldName);

    for digits in ["0", "1"] {
        let fields = [digits];
        let store = StoreSpec { fields: &fields, ..Default::default() }.build();
        let err = check_non_named_fields(&store).unwrap_err();
        assert_eq!(err, DefinitionError::DigitFieldName(digits.to_owned()));
        assert_eq!(err.to_string(), format!("Field names can't be digits: {digits}"));
    }
}

#[test]
fn registered_is_union_of_fields_and_instance_hints() {
    assert!(registered(StoreSpec::default()).is_empty());
    assert_eq!(
        registered(StoreSpec { fields: &["field_1", "field_2"], ..Default::default() }),
        ["field_1", "field_2"]
    );
    assert_eq!(
        registered(StoreSpec { inst_hints: &["field_2", "field_3"], ..Default::default() }),
        ["field_2", "field_3"]
    );
    assert_eq!(
        registered(StoreSpec {
            fields: &["field_1", "field_2"],
            inst_hints: &["field_2", "field_3"],
            ..Default::default()
        }),
        ["field_1", "field_2", "field_3"]
    );
    assert_eq!(
        registered(StoreSpec {
            fields: &["field_1", "field_2"],
            inst_hints: &["field_1", "field_2"],
            ..Default::default()
        }),
        ["field_1", "field_2"]
    );
}
