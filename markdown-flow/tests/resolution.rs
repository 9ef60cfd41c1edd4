use markdown_flow::escape::process_inline_escapes;
use markdown_flow::{UNKNOWN, Variables, resolve_variables};

#[test]
fn missing_variable_falls_back() {
    assert_eq!(resolve_variables("{{missing}}", &Variables::new(), None), UNKNOWN);
}

#[test]
fn null_and_empty_values_fall_back() {
    let mut variables = Variables::new();
    variables.insert("empty", "");
    variables.insert_null("null");
    assert_eq!(
        resolve_variables("{{empty}}/{{null}}", &variables, None),
        "UNKNOWN/UNKNOWN"
    );
    assert_eq!(variables.get("empty"), None);
    assert_eq!(variables.len(), 2);
}

#[test]
fn names_are_trimmed() {
    let variables = Variables::from([("name", "Ada")]);
    assert_eq!(resolve_variables("Hi {{ name }}!", &variables, None), "Hi Ada!");
}

#[test]
fn preserved_variables_are_left_alone() {
    let variables = Variables::from([("x", "1")]);
    assert_eq!(
        resolve_variables("keep %{{x}} but {{x}}", &variables, None),
        "keep %{{x}} but 1"
    );
}

#[test]
fn percent_only_shields_the_marker_it_touches() {
    let variables = Variables::from([("c", "1")]);
    assert_eq!(resolve_variables("%{{{c}}", &variables, None), "%{1");
}

#[test]
fn replacement_values_are_not_rescanned() {
    let variables = Variables::from([("a", "{{b}}"), ("b", "2")]);
    assert_eq!(resolve_variables("{{a}} {{b}}", &variables, None), "{{b}} 2");
}

#[test]
fn full_escape_blocks_every_substitution() {
    let info = process_inline_escapes("\\{{x}} and {{y}}");
    let variables = Variables::from([("x", "1"), ("y", "2")]);
    assert_eq!(
        resolve_variables(&info.processed_text, &variables, Some(&info)),
        "{{x}} and {{y}}"
    );
}

#[test]
fn partial_escape_substitutes_only_recorded_positions() {
    let info = process_inline_escapes("\\%{{x}} and {{y}}");
    let variables = Variables::from([("x", "1"), ("y", "2")]);
    assert_eq!(
        resolve_variables(&info.processed_text, &variables, Some(&info)),
        "%1 and {{y}}"
    );
}

#[test]
fn unescaped_text_substitutes_everything() {
    let info = process_inline_escapes("{{x}}{{y}}");
    let variables = Variables::from([("x", "1")]);
    assert_eq!(
        resolve_variables(&info.processed_text, &variables, Some(&info)),
        "1UNKNOWN"
    );
}

#[test]
fn variables_overlay() {
    let mut base = Variables::from([("a", "1"), ("b", "2")]);
    base.extend(Variables::from([("b", "3")]));
    assert_eq!(base.value_of("a"), "1");
    assert_eq!(base.value_of("b"), "3");
    assert_eq!(base.value_of("c"), UNKNOWN);
}
