use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::escape::EscapeInfo;

/// Substituted for variables that are missing, null or empty.
pub const UNKNOWN: &str = "UNKNOWN";

/// Variable values supplied by the caller. A name may map to no value (null).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Variables(BTreeMap<String, Option<String>>);

impl Variables {
    pub fn new() -> Self {
        Variables::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), Some(value.into()));
    }

    /// Record a name with no value; it resolves to [`UNKNOWN`].
    pub fn insert_null(&mut self, name: impl Into<String>) {
        self.0.insert(name.into(), None);
    }

    /// Overlay `other` on top of `self`.
    pub fn extend(&mut self, other: Variables) {
        self.0.extend(other.0);
    }

    /// The usable value for `name`: present and non-empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .and_then(|value| value.as_deref())
            .filter(|value| !value.is_empty())
    }

    /// The value substituted for `name`.
    pub fn value_of(&self, name: &str) -> &str {
        self.get(name).unwrap_or(UNKNOWN)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Variables(
            iter.into_iter()
                .map(|(name, value)| (name.into(), Some(value.into())))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Variables {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Variable references
// ---------------------------------------------------------------------------

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^}]+)\}\}").expect("variable pattern must compile")
});

/// A `{{name}}` occurrence that is not part of a `%{{name}}` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reference<'t> {
    pub span: Range<usize>,
    /// The name as written, untrimmed.
    pub name: &'t str,
}

/// Scan `text` for `{{name}}` references, skipping any preceded by `%`.
///
/// A rejected candidate resumes the scan one byte after its start, so `%{{{a}}` still yields
/// `{{a}}`.
pub(crate) fn references(text: &str) -> References<'_> {
    References {
        text,
        live: &[],
        at: 0,
    }
}

/// Like [`references`], but a `%{{name}}` whose marker starts inside one of `live` is kept.
/// This is how `\%{{name}}` stays substitutable after its escape is removed.
pub(crate) fn live_references<'t>(text: &'t str, live: &'t [Range<usize>]) -> References<'t> {
    References { text, live, at: 0 }
}

pub(crate) struct References<'t> {
    text: &'t str,
    live: &'t [Range<usize>],
    at: usize,
}

impl<'t> Iterator for References<'t> {
    type Item = Reference<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.at <= self.text.len() {
            let captures = VARIABLE.captures_at(self.text, self.at)?;
            let (whole, name) = (captures.get(0)?, captures.get(1)?);
            let preserved = self.text[..whole.start()].ends_with('%');
            if preserved && !self.live.iter().any(|range| range.contains(&whole.start())) {
                // `{` is one byte, so this stays on a char boundary.
                self.at = whole.start() + 1;
                continue;
            }
            self.at = whole.end();
            return Some(Reference {
                span: whole.range(),
                name: name.as_str(),
            });
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Replace `{{name}}` references in `text` with values from `variables`.
///
/// With `escape_info`, a reference is only replaced where the escape info allows it: never
/// under a full escape, and only inside the recorded positions under a partial escape, where
/// `\%{{name}}` resolves to `%` followed by the value. `escape_info` must describe exactly
/// `text`.
pub fn resolve_variables(
    text: &str,
    variables: &Variables,
    escape_info: Option<&EscapeInfo>,
) -> String {
    let live = escape_info.map_or(&[][..], |info| info.variable_positions.as_slice());
    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for reference in live_references(text, live) {
        let substitute = escape_info.is_none_or(|info| info.is_substitutable(reference.span.start));
        if !substitute {
            continue;
        }
        output.push_str(&text[last..reference.span.start]);
        output.push_str(variables.value_of(reference.name.trim()));
        last = reference.span.end;
    }

    output.push_str(&text[last..]);
    output
}
