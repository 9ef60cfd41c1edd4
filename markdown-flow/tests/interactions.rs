use markdown_flow::interaction::{Button, Interaction, parse_buttons, parse_interaction};
use markdown_flow::parser::inline::parse_interaction_block;
use pretty_assertions::assert_eq;

#[test]
fn button_list_splits_on_first_value_separator() {
    assert_eq!(
        parse_buttons("A//1|B|  |C//2//x"),
        vec![
            Button::new("A", "1"),
            Button::plain("B"),
            Button::new("C", "2//x"),
        ]
    );
}

#[test]
fn button_list_drops_empty_segments() {
    assert_eq!(parse_buttons("|| Yes |  | No |"), vec![Button::plain("Yes"), Button::plain("No")]);
    assert!(parse_buttons("").is_empty());
}

#[test]
fn bound_buttons() {
    assert_eq!(
        parse_interaction("%{{choice}}Yes|No"),
        Interaction::ButtonsOnly {
            variable: Some("choice".to_string()),
            buttons: vec![Button::plain("Yes"), Button::plain("No")],
        }
    );
}

#[test]
fn bound_single_button() {
    assert_eq!(
        parse_interaction("%{{ack}} Got it//yes"),
        Interaction::ButtonsOnly {
            variable: Some("ack".to_string()),
            buttons: vec![Button::new("Got it", "yes")],
        }
    );
}

#[test]
fn text_input() {
    assert_eq!(
        parse_interaction("%{{name}}...What is your name?"),
        Interaction::TextOnly {
            variable: "name".to_string(),
            question: "What is your name?".to_string(),
        }
    );
}

#[test]
fn buttons_with_text_input() {
    assert_eq!(
        parse_interaction("%{{level}} Beginner | Expert//pro ... Or describe yourself"),
        Interaction::ButtonsWithText {
            variable: "level".to_string(),
            buttons: vec![Button::plain("Beginner"), Button::new("Expert", "pro")],
            question: "Or describe yourself".to_string(),
        }
    );
}

#[test]
fn text_before_ellipsis_without_pipe_is_discarded() {
    assert_eq!(
        parse_interaction("%{{x}}Only...question"),
        Interaction::TextOnly {
            variable: "x".to_string(),
            question: "question".to_string(),
        }
    );
}

#[test]
fn bare_binding_is_text_input_without_question() {
    assert_eq!(
        parse_interaction("%{{ x }}"),
        Interaction::TextOnly {
            variable: "x".to_string(),
            question: String::new(),
        }
    );
}

#[test]
fn binding_does_not_cross_lines() {
    assert_eq!(
        parse_interaction("%{{x}}\nA|B"),
        Interaction::NonAssignmentButton {
            buttons: vec![Button::plain("%{{x}}\nA"), Button::plain("B")],
        }
    );

    let interaction = parse_interaction("%{{answer}}...\nTell us more");
    assert_eq!(interaction.variable(), None);
    assert!(!interaction.is_error());
}

#[test]
fn unbound_buttons() {
    assert_eq!(
        parse_interaction("Continue | Skip//skip"),
        Interaction::NonAssignmentButton {
            buttons: vec![Button::plain("Continue"), Button::new("Skip", "skip")],
        }
    );
}

#[test]
fn empty_content_gets_a_placeholder_button() {
    assert_eq!(
        parse_interaction(""),
        Interaction::NonAssignmentButton {
            buttons: vec![Button::new("", "")],
        }
    );
}

#[test]
fn markdown_link_is_rejected() {
    let interaction = parse_interaction("[Docs](https://example.com)");
    assert!(interaction.is_error());
    assert_eq!(interaction.variable(), None);
    assert!(interaction.buttons().is_empty());
}

#[test]
fn interaction_block_strips_brackets_and_escapes() {
    let parsed = parse_interaction_block("?[ %{{c}} A\\//1 | B ]");
    assert_eq!(
        parsed.interaction,
        Interaction::ButtonsOnly {
            variable: Some("c".to_string()),
            buttons: vec![Button::new("A", "1"), Button::plain("B")],
        }
    );
    assert_eq!(parsed.original_content, "?[ %{{c}} A\\//1 | B ]");
    assert_eq!(parsed.escape_info.processed_text, "%{{c}} A//1 | B");
}

#[test]
fn interaction_variables_include_question_references() {
    let parsed = parse_interaction_block("?[%{{age}}...How old are you, {{name}}?]");
    assert_eq!(parsed.variables(), vec!["age", "name"]);
}
