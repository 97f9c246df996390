use std::io;
use std::num::ParseIntError;

use error_mold::reraise::{catch, skip, Action, MatchSet, Matcher, Reraising, Rule};
use error_mold::{
    fields, ConstructionError, ErrorClass, Raised, RemapOptions, UsageError,
};


fn io_error() -> Raised {
    Raised::foreign(io::Error::other("disk"))
}

fn parse_error() -> Raised {
    "x".parse::<i32>().unwrap_err().into()
}

fn class_with(name: &str, reraising: impl Into<Reraising>) -> ErrorClass {
    ErrorClass::builder(name)
        .template(format!("{name} failed"))
        .reraising(reraising)
        .build()
        .unwrap()
}

#[test]
fn catch_replaces_matching_foreign_errors() {
    let class = class_with("StorageError", catch(Matcher::foreign::<io::Error>()));

    let remapped = class.remap(&io_error()).unwrap().unwrap();
    assert_eq!(remapped.class(), &class);
    assert_eq!(remapped.message(), "StorageError failed");
    assert!(remapped.cause().is_none());

    assert!(class.remap(&parse_error()).unwrap().is_none());
}

#[test]
fn reraise_sets_the_original_as_cause() {
    let class = class_with("StorageError", catch(Matcher::foreign::<io::Error>()));

    let err = class.reraise(|| Err::<(), _>(io::Error::other("disk"))).unwrap_err();
    let structured = err.as_structured().unwrap();
    assert_eq!(structured.class(), &class);
    let cause = structured.cause().unwrap();
    assert_eq!(cause.to_string(), "disk");
    assert!(cause.downcast_ref::<io::Error>().is_some());

    assert_eq!(class.reraise(|| Ok::<_, io::Error>(5)).unwrap(), 5);
}

#[test]
fn unmatched_errors_propagate_unchanged() {
    let class = class_with("StorageError", catch(Matcher::foreign::<io::Error>()));
    let err = class.reraise(|| "x".parse::<u8>()).unwrap_err();
    assert!(err.downcast_ref::<ParseIntError>().is_some());
}

#[test]
fn never_and_empty_rules_do_nothing() {
    for class in [class_with("Never", Reraising::Never), class_with("Empty", Vec::<Rule>::new())] {
        assert!(class.remap(&io_error()).unwrap().is_none());
    }
}

#[test]
fn greedy_catches_everything_but_fatal_errors() {
    let greedy = class_with("Greedy", true);
    assert!(greedy.remap(&io_error()).unwrap().is_some());
    assert!(greedy.remap(&parse_error()).unwrap().is_some());

    let fatal = ErrorClass::builder("Fatal").template("fatal").fatal().build().unwrap();
    let fatal_err: Raised = fatal.create(fields! {}).unwrap().into();
    assert!(greedy.remap(&fatal_err).unwrap().is_none());

    let err = greedy.reraise(|| Err::<(), _>(fatal_err.clone())).unwrap_err();
    assert!(err.is_instance_of(&fatal));
}

#[test]
fn instances_of_the_handling_class_are_left_alone() {
    let greedy = class_with("Greedy", true);
    let child = ErrorClass::builder("GreedyChild").extends(&greedy).build().unwrap();
    let own: Raised = child.create(fields! {}).unwrap().into();

    assert!(greedy.remap(&own).unwrap().is_none());
}

#[test]
fn first_matching_rule_decides() {
    let class = class_with(
        "Picky",
        Reraising::from(skip(Matcher::foreign::<io::Error>())).then(catch(MatchSet::any())),
    );
    assert!(class.remap(&io_error()).unwrap().is_none());
    assert!(class.remap(&parse_error()).unwrap().is_some());
}

#[test]
fn exclude_carves_out_errors_before_matching() {
    let class = class_with(
        "Picky",
        catch(MatchSet::any()).exclude(Matcher::foreign::<ParseIntError>()),
    );
    assert!(class.remap(&parse_error()).unwrap().is_none());
    assert!(class.remap(&io_error()).unwrap().is_some());
}

#[test]
fn structured_matchers_follow_inheritance() {
    let base = ErrorClass::builder("Base").template("base").build().unwrap();
    let derived = ErrorClass::builder("Derived").extends(&base).build().unwrap();
    let other = ErrorClass::builder("Other").template("other").build().unwrap();
    let class = class_with("Wrapper", catch(&base));

    let derived_err: Raised = derived.create(fields! {}).unwrap().into();
    let other_err: Raised = other.create(fields! {}).unwrap().into();
    assert!(class.remap(&derived_err).unwrap().is_some());
    assert!(class.remap(&other_err).unwrap().is_none());
}

#[test]
fn replace_builds_the_target_class() {
    let target = ErrorClass::builder("Target")
        .template("target {code}")
        .field::<i64>("code")
        .build()
        .unwrap();
    let class = class_with("Router", catch(Matcher::foreign::<io::Error>()).to(&target));

    let options = RemapOptions::new().remap_kwargs(fields! { code: 503 });
    let remapped = class.remap_with(&io_error(), &options).unwrap().unwrap();
    assert_eq!(remapped.class(), &target);
    assert_eq!(remapped.message(), "target 503");
}

#[test]
fn method_actions_call_registered_methods() {
    let class = ErrorClass::builder("Translator")
        .template("translated: {detail}")
        .field::<String>("detail")
        .method("from_io", |class, exc, kwargs| {
            let mut kwargs = kwargs.clone();
            kwargs.insert("detail".into(), exc.to_string().into());
            Ok(Some(class.create(kwargs)?))
        })
        .reraising(catch(Matcher::foreign::<io::Error>()).to(Action::method("from_io")))
        .build()
        .unwrap();

    let remapped = class.remap(&io_error()).unwrap().unwrap();
    assert_eq!(remapped.message(), "translated: disk");
}

#[test]
fn method_named_after_the_class_means_the_class() {
    let class = class_with(
        "SelfNamed",
        catch(Matcher::foreign::<io::Error>()).to(Action::method("SelfNamed")),
    );
    assert_eq!(class.remap(&io_error()).unwrap().unwrap().class(), &class);
}

#[test]
fn methods_are_inherited_by_subclasses() {
    let base = ErrorClass::builder("Base")
        .template("base")
        .method("declines", |_, _, _| Ok(None))
        .build()
        .unwrap();
    let child = ErrorClass::builder("Child")
        .extends(&base)
        .reraising(catch(MatchSet::any()).to(Action::method("declines")))
        .build()
        .unwrap();
    assert!(child.remap(&io_error()).unwrap().is_none());
}

#[test]
fn invoke_actions_receive_the_error() {
    let class = class_with(
        "Counted",
        catch(MatchSet::any()).to(Action::invoke(|class, exc, _| {
            if exc.type_name() == "ParseIntError" {
                Ok(Some(class.create(fields! {})?))
            } else {
                Ok(None)
            }
        })),
    );
    assert!(class.remap(&parse_error()).unwrap().is_some());
    assert!(class.remap(&io_error()).unwrap().is_none());
}

#[test]
fn ad_hoc_rules_override_class_rules() {
    let class = class_with("Quiet", Reraising::Never);
    let options = RemapOptions::new().reraising(catch(Matcher::foreign::<io::Error>()));

    assert!(class.remap(&io_error()).unwrap().is_none());
    assert!(class.remap_with(&io_error(), &options).unwrap().is_some());

    let bad = RemapOptions::new().reraising(catch(MatchSet::any()).to(Action::method("missing")));
    let err = class.remap_with(&io_error(), &bad).unwrap_err();
    assert_eq!(err.to_string(), "Unsupported action: missing");
}

#[test]
fn remap_or_original_always_returns_an_error() {
    let class = class_with("StorageError", catch(Matcher::foreign::<io::Error>()));
    let options = RemapOptions::new();

    let replaced = class.remap_or_original(io_error(), &options).unwrap();
    assert!(replaced.is_instance_of(&class));
    let cause = replaced.as_structured().and_then(|e| e.cause());
    assert_eq!(cause.map(Raised::type_name), Some("Error"));

    let kept = class.remap_or_original(parse_error(), &options).unwrap();
    assert_eq!(kept.type_name(), "ParseIntError");
}

#[test]
fn failed_replacement_surfaces_the_toolkit_error() {
    let class = ErrorClass::builder("NeedsCode")
        .template("code {code}")
        .field::<i64>("code")
        .reraising(true)
        .build()
        .unwrap();

    assert!(matches!(
        class.remap(&io_error()),
        Err(UsageError::Construction(ConstructionError::MissingFields(_)))
    ));

    let err = class.reraise(|| Err::<(), _>(io::Error::other("disk"))).unwrap_err();
    let foreign = err.as_foreign().unwrap();
    assert!(foreign.is::<UsageError>());
    assert_eq!(err.to_string(), "Missing arguments: 'code'");
    assert_eq!(foreign.context().map(ToString::to_string).as_deref(), Some("disk"));

    let options = RemapOptions::new().remap_kwargs(fields! { code: 1 });
    let err = class.reraise_with(&options, || Err::<(), _>(io::Error::other("disk"))).unwrap_err();
    assert_eq!(err.to_string(), "code 1");
}

#[test]
fn rewrap_guards_every_call() {
    let class = class_with("BadNumber", catch(Matcher::foreign::<ParseIntError>()));
    let parse = class.rewrap(RemapOptions::new(), |raw: &str| raw.parse::<i32>());

    assert_eq!(parse("12").unwrap(), 12);
    assert!(parse("x").unwrap_err().is_instance_of(&class));
    assert!(parse("y").unwrap_err().is_instance_of(&class));
}
