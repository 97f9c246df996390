use error_mold::reraise::catch;
use error_mold::schema::{Hint, TypeHint};
use error_mold::{
    fields, ConstructionError, DefinitionError, ErrorClass, Registry, Toggles, UsageError,
    UsageKind,
};

use crate::fixtures;

mod checks;

#[test]
fn builder_collects_store_from_template_and_hints() {
    let class = fixtures::mixed();
    let store = class.store();

    assert_eq!(store.fields().iter().collect::<Vec<_>>(), ["ENTITY", "age", "name"]);
    assert_eq!(store.const_hints().keys().collect::<Vec<_>>(), ["ENTITY"]);
    assert_eq!(store.inst_hints().keys().collect::<Vec<_>>(), ["name", "age", "my_type"]);
    assert_eq!(store.defaults().iter().collect::<Vec<_>>(), ["age", "my_type"]);
    assert_eq!(store.consts()["ENTITY"], "The Entity".into());
}

#[test]
fn constant_hint_without_value_is_not_a_constant() {
    let class = fixtures::class_vars();
    assert!(class.store().const_hints().contains_key("blah"));
    assert!(!class.store().consts().contains_key("blah"));
    assert_eq!(class.hints()["blah"], Hint::Constant(TypeHint::of::<f64>()));
}

#[test]
fn subclass_inherits_hints_and_overrides_template() {
    let parent = fixtures::mixed();
    let child = fixtures::derived(&parent);

    assert_eq!(child.parent(), Some(&parent));
    assert!(child.is_subclass_of(&parent));
    assert!(child.is_subclass_of(&ErrorClass::root()));
    assert!(!parent.is_subclass_of(&child));
    assert_eq!(child.template(), "The {name} {surname} is {age} years old");
    assert_eq!(
        child.store().inst_hints().keys().collect::<Vec<_>>(),
        ["name", "age", "my_type", "surname", "location", "full_name"]
    );
    assert_eq!(child.store().consts()["ENTITY"], "The Entity".into());

    let names: Vec<_> = child.ancestors().map(|c| c.name().to_owned()).collect();
    assert_eq!(names, ["DerivedError", "MixedError", "Error"]);
}

#[test]
fn template_and_toggles_are_inherited_when_not_declared() {
    let parent = ErrorClass::builder("Parent")
        .template("parent {code}")
        .toggles(Toggles::DEFAULT - Toggles::FORBID_UNDECLARED_FIELDS)
        .field::<i64>("code")
        .build()
        .unwrap();
    let child = ErrorClass::builder("Child").extends(&parent).build().unwrap();

    assert_eq!(child.template(), "parent {code}");
    assert_eq!(child.toggles(), parent.toggles());
    let err = child.create(fields! { code: 7, extra: true }).unwrap();
    assert_eq!(err.message(), "parent 7");
}

#[test]
fn set_overrides_inherited_constant() {
    let parent = fixtures::mixed();
    let child = ErrorClass::builder("Renamed")
        .extends(&parent)
        .set("ENTITY", "Another")
        .set("name", "anonymous")
        .build()
        .unwrap();

    assert_eq!(child.store().consts()["ENTITY"], "Another".into());
    assert!(child.store().defaults().contains("name"));
    let err = child.create(fields! {}).unwrap();
    assert_eq!(err.message(), "The anonymous is 0 years old with Another");
}

#[test]
fn reserved_names_never_become_fields() {
    let class = ErrorClass::builder("Reserved")
        .template("static")
        .field::<String>("__template__")
        .constant("__toggles__", 1)
        .build()
        .unwrap();
    assert!(class.hints().is_empty());
    assert!(class.store().registered().is_empty());
}

#[test]
fn root_class_defaults() {
    let root = ErrorClass::root();
    assert_eq!(root.name(), "Error");
    assert_eq!(root.toggles(), Toggles::DEFAULT);
    assert!(!root.is_fatal());
    assert_eq!(root.create(fields! {}).unwrap().message(), "Unspecified error");
}

#[test]
fn default_toggles_reject_unannotated_template_fields() {
    let err =
        ErrorClass::builder("Loose").template("{a} and {b}").field::<i64>("a").build().unwrap_err();
    assert_eq!(err.to_string(), "Unannotated fields: 'b'");
    assert_eq!(err.kind(), UsageKind::Value);

    ErrorClass::builder("Loose")
        .template("{a} and {b}")
        .toggles(Toggles::DEFAULT - Toggles::FORBID_UNANNOTATED_FIELDS)
        .field::<i64>("a")
        .build()
        .unwrap();
}

#[test]
fn default_toggles_reject_positional_template_fields() {
    let err = ErrorClass::builder("Positional").template("{0}").build().unwrap_err();
    assert_eq!(err, DefinitionError::DigitFieldName("0".into()));

    let err = ErrorClass::builder("Auto").template("value: {}").build().unwrap_err();
    assert_eq!(err, DefinitionError::EmptyFieldName);
}

#[test]
fn fatal_must_be_declared_directly() {
    let fatal = ErrorClass::builder("Fatal").template("fatal").fatal().build().unwrap();
    assert!(fatal.is_fatal());

    let err = ErrorClass::builder("Child").extends(&fatal).build().unwrap_err();
    assert_eq!(err, DefinitionError::IndirectFatal("Child".into()));
    assert_eq!(err.kind(), UsageKind::Type);

    let child = ErrorClass::builder("Child").extends(&fatal).fatal().build().unwrap();
    assert!(child.is_fatal());
}

#[test]
fn unknown_method_action_fails_at_build() {
    let err = ErrorClass::builder("Remapper")
        .template("remapped")
        .reraising(catch(ErrorClass::root()).to(error_mold::reraise::Action::method("convert")))
        .build()
        .unwrap_err();
    assert_eq!(err, DefinitionError::UnsupportedAction("convert".into()));
}

#[test]
fn class_identity_and_display() {
    let a = ErrorClass::builder("Same").template("x").build().unwrap();
    let b = ErrorClass::builder("Same").template("x").build().unwrap();
    assert_eq!(a, a.clone());
    assert_ne!(a, b);
    assert_eq!(a.to_string(), "Same");
    assert_eq!(format!("{a:?}"), "<class 'Same'>");

    let namespaced = ErrorClass::builder("Scoped").namespace("app").template("x").build().unwrap();
    assert_eq!(namespaced.qualname(), "app::Scoped");
    assert_eq!(format!("{namespaced:?}"), "<class 'app::Scoped'>");
}

#[test]
fn registry_defines_and_resolves() {
    let mut registry = Registry::new("app");
    assert!(registry.is_empty());

    let base = registry.define(ErrorClass::builder("AppError").template("app failed")).unwrap();
    let io = registry
        .define(ErrorClass::builder("IoError").extends(&base).template("io failed"))
        .unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(base.namespace(), Some("app"));
    assert_eq!(registry.resolve("IoError").unwrap(), &io);
    assert_eq!(registry.iter().map(ErrorClass::name).collect::<Vec<_>>(), ["AppError", "IoError"]);

    let err = registry.resolve("Nope").unwrap_err();
    assert_eq!(err.to_string(), "namespace 'app' has no attribute 'Nope'");
}

#[test]
fn registry_rejects_duplicates() {
    let mut registry = Registry::new("app");
    registry.define(ErrorClass::builder("AppError").template("a")).unwrap();

    let err = registry.define(ErrorClass::builder("AppError").template("b")).unwrap_err();
    assert_eq!(
        err,
        DefinitionError::DuplicateClass { namespace: "app".into(), name: "AppError".into() }
    );

    let outside = ErrorClass::builder("AppError").template("c").build().unwrap();
    assert!(registry.insert(outside).is_err());
}

#[test]
fn registry_rejects_classes_from_other_namespaces() {
    let mut registry = Registry::new("app");

    let err = registry
        .define(ErrorClass::builder("Other").namespace("elsewhere").template("other"))
        .unwrap_err();
    assert_eq!(
        err,
        DefinitionError::ForeignNamespace {
            namespace: "app".into(),
            name: "Other".into(),
            found: "elsewhere".into(),
        }
    );
    assert_eq!(err.kind(), UsageKind::Type);

    let built =
        ErrorClass::builder("Other").namespace("elsewhere").template("other").build().unwrap();
    assert!(registry.insert(built).is_err());
    assert!(registry.is_empty());

    let scoped =
        ErrorClass::builder("Scoped").namespace("app").template("scoped").build().unwrap();
    registry.insert(scoped.clone()).unwrap();
    let revived = registry.revive(&scoped.create(fields! {}).unwrap().reduce()).unwrap();
    assert_eq!(revived.class(), &scoped);

    let same = registry
        .define(ErrorClass::builder("Same").namespace("app").template("same"))
        .unwrap();
    assert!(registry.revive(&same.create(fields! {}).unwrap().reduce()).is_ok());
}

#[test]
fn registry_lists_direct_subclasses_in_definition_order() {
    let mut registry = Registry::new("tree");
    let root = registry.define(ErrorClass::builder("Root").template("root")).unwrap();
    let a = registry.define(ErrorClass::builder("A").extends(&root)).unwrap();
    let b = registry.define(ErrorClass::builder("B").extends(&root)).unwrap();
    registry.define(ErrorClass::builder("AA").extends(&a)).unwrap();

    assert_eq!(registry.subclasses(&root), [a.clone(), b]);
    assert_eq!(registry.subclasses(&a).len(), 1);
}

#[test]
fn revive_rebuilds_an_equivalent_instance() {
    let mut registry = Registry::new("people");
    let parent = fixtures::mixed();
    registry.insert(parent.clone()).unwrap();
    let derived = registry
        .define(
            ErrorClass::builder("PersonError")
                .extends(&parent)
                .template("{name} is {age}")
                .field_default("age", 30),
        )
        .unwrap();

    let err = derived.create(fields! { name: "Ann" }).unwrap();
    let reduced = err.reduce();
    assert_eq!(reduced.namespace.as_deref(), Some("people"));
    assert_eq!(reduced.class, "PersonError");

    let revived = registry.revive(&reduced).unwrap();
    assert_eq!(revived.class(), &derived);
    assert_eq!(revived.message(), "Ann is 30");
    assert_eq!(revived.as_dict(false), err.as_dict(false));
}

#[test]
fn revive_fails_for_unknown_namespace_or_bad_fields() {
    let mut registry = Registry::new("people");
    let class = registry
        .define(ErrorClass::builder("PersonError").template("{name}").field::<String>("name"))
        .unwrap();

    let mut reduced = class.create(fields! { name: "Bob" }).unwrap().reduce();
    reduced.namespace = Some("elsewhere".into());
    assert!(matches!(
        registry.revive(&reduced),
        Err(UsageError::Definition(DefinitionError::UnknownClass { .. }))
    ));

    reduced.namespace = Some("people".into());
    reduced.kwargs = fields! {};
    assert!(matches!(
        registry.revive(&reduced),
        Err(UsageError::Construction(ConstructionError::MissingFields(_)))
    ));
}
