use error_mold::template::format_template;
use error_mold::{fields, TemplateError};

fn render(template: &str) -> String {
    let kwargs = fields! {
        name: "John",
        age: 42,
        neg: -3.14159,
        big: 1234567,
        ratio: 0.256,
        sci: 12345.678,
        tiny: 0.0001,
        half: 1.5,
        two: 2.0,
        flag: true,
        list: vec![1, 2],
    };
    format_template(template, &kwargs).unwrap()
}

#[test]
fn string_alignment_and_precision() {
    assert_eq!(render("{name:*^20}"), "********John********");
    assert_eq!(render("{name:>6}"), "  John");
    assert_eq!(render("{name:<6}|"), "John  |");
    assert_eq!(render("{name:.2}"), "Jo");
}

#[test]
fn integer_presentations() {
    assert_eq!(render("{age: f}"), " 42.000000");
    assert_eq!(render("{age:#b}"), "0b101010");
    assert_eq!(render("{age:x}"), "2a");
    assert_eq!(render("{age:#X}"), "0X2A");
    assert_eq!(render("{age:+d}"), "+42");
    assert_eq!(render("{age:05}"), "00042");
    assert_eq!(render("{big:,}"), "1,234,567");
    assert_eq!(render("{big:_}"), "1_234_567");
}

#[test]
fn float_presentations() {
    assert_eq!(render("{neg:08.3f}"), "-003.142");
    assert_eq!(render("{ratio:.1%}"), "25.6%");
    assert_eq!(render("{sci:e}"), "1.234568e+04");
    assert_eq!(render("{tiny:g}"), "0.0001");
    assert_eq!(render("{half}"), "1.5");
    assert_eq!(render("{two}"), "2.0");
}

#[test]
fn conversions_apply_before_spec() {
    assert_eq!(render("{name!r}"), "\"John\"");
    assert_eq!(render("{name!s:>5}"), " John");
}

#[test]
fn other_values_accept_only_empty_spec() {
    assert_eq!(render("{flag}"), "True");
    assert_eq!(render("{flag:>6}"), "  True");
    assert_eq!(render("{list}"), "[1, 2]");

    let err = format_template("{list:>5}", &fields! { list: vec![1] }).unwrap_err();
    assert!(matches!(err, TemplateError::Unsupported { kind: "list", .. }));
}

#[test]
fn floats_reject_integer_codes() {
    let err = format_template("{x:d}", &fields! { x: 1.0 }).unwrap_err();
    assert_eq!(err, TemplateError::UnknownCode { code: 'd', kind: "float" });
}
