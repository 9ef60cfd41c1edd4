use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// A selectable choice in an interaction block: `display//value` or just `display`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub display: String,
    pub value: String,
}

impl Button {
    pub fn new(display: impl Into<String>, value: impl Into<String>) -> Self {
        Button {
            display: display.into(),
            value: value.into(),
        }
    }

    /// A button whose value is its label.
    pub fn plain(label: impl Into<String>) -> Self {
        let label = label.into();
        Button {
            display: label.clone(),
            value: label,
        }
    }
}

/// The parsed shape of an interaction block's inner content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interaction {
    /// `%{{var}} A | B`: pick one of the buttons.
    ButtonsOnly {
        variable: Option<String>,
        buttons: Vec<Button>,
    },
    /// `%{{var}} A | B ... question`: pick a button or type an answer.
    ButtonsWithText {
        variable: String,
        buttons: Vec<Button>,
        question: String,
    },
    /// `%{{var}} ... question`: free-text answer.
    TextOnly { variable: String, question: String },
    /// Buttons without a variable binding.
    NonAssignmentButton { buttons: Vec<Button> },
    /// Content that cannot be used as an interaction.
    Error { message: String },
}

impl Interaction {
    /// The variable this interaction assigns, if any.
    pub fn variable(&self) -> Option<&str> {
        match self {
            Interaction::ButtonsOnly { variable, .. } => variable.as_deref(),
            Interaction::ButtonsWithText { variable, .. } | Interaction::TextOnly { variable, .. } => {
                Some(variable)
            }
            Interaction::NonAssignmentButton { .. } | Interaction::Error { .. } => None,
        }
    }

    /// The free-text prompt, for shapes that accept typed input.
    pub fn question(&self) -> Option<&str> {
        match self {
            Interaction::ButtonsWithText { question, .. } | Interaction::TextOnly { question, .. } => {
                Some(question)
            }
            _ => None,
        }
    }

    pub fn buttons(&self) -> &[Button] {
        match self {
            Interaction::ButtonsOnly { buttons, .. }
            | Interaction::ButtonsWithText { buttons, .. }
            | Interaction::NonAssignmentButton { buttons } => buttons,
            Interaction::TextOnly { .. } | Interaction::Error { .. } => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Interaction::Error { .. })
    }
}

/// `text](url)`: a markdown link that leaked into `?[...]`.
static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\]]+\]\([^)]+\)$").expect("markdown link pattern must compile")
});

/// `%{{name}}` at the start of the content, followed by the rest of a single line. Content with
/// a line break after the binding is not bound.
static VARIABLE_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^%\{\{([^}]+)\}\}(.*)$").expect("variable binding pattern must compile")
});

const ELLIPSIS: &str = "...";
const BUTTON_SEPARATOR: char = '|';
const VALUE_SEPARATOR: &str = "//";

/// Parse the inner content of `?[...]`, already inline-escaped.
pub fn parse_interaction(content: &str) -> Interaction {
    let trimmed = content.trim();

    if MARKDOWN_LINK.is_match(trimmed) {
        return Interaction::Error {
            message: "Markdown link format not supported as interaction".to_string(),
        };
    }

    let Some(binding) = VARIABLE_BINDING.captures(trimmed) else {
        let buttons = if content.is_empty() {
            vec![Button::new("", "")]
        } else {
            parse_buttons(content)
        };
        return Interaction::NonAssignmentButton { buttons };
    };

    let variable = binding
        .get(1)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    let remaining = binding.get(2).map(|m| m.as_str().trim()).unwrap_or_default();

    if let Some((buttons_part, question)) = remaining.split_once(ELLIPSIS) {
        let buttons_part = buttons_part.trim();
        let question = question.trim().to_string();
        if !buttons_part.is_empty() && buttons_part.contains(BUTTON_SEPARATOR) {
            Interaction::ButtonsWithText {
                variable,
                buttons: parse_buttons(buttons_part),
                question,
            }
        } else {
            Interaction::TextOnly { variable, question }
        }
    } else if remaining.is_empty() {
        Interaction::TextOnly {
            variable,
            question: String::new(),
        }
    } else {
        Interaction::ButtonsOnly {
            variable: Some(variable),
            buttons: parse_buttons(remaining),
        }
    }
}

/// Split `A//1 | B | C` into buttons. Empty segments are dropped and only the first `//`
/// separates display from value.
pub fn parse_buttons(content: &str) -> Vec<Button> {
    content
        .split(BUTTON_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once(VALUE_SEPARATOR) {
            Some((display, value)) => Button::new(display.trim(), value.trim()),
            None => Button::plain(segment),
        })
        .collect()
}
