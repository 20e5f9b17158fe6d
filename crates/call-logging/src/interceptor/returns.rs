//! Rendering of return values in `RETURNED` lines.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::constants::FIELD_SEPARATOR;
use crate::projection::{FieldFilter, format_for_log, resolve_path};

/// Decides whether a rule applies to a return value.
pub type ReturnPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Renders a return value; None renders nothing.
pub type ReturnFormatter = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// A named path rendered as `name=value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnField {
    /// Name shown in the line.
    pub name: String,
    /// Dotted path into the return value.
    pub path: String,
}

impl ReturnField {
    /// Creates a field.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A conditional return format.
#[derive(Clone)]
pub struct ReturnRule {
    predicate: ReturnPredicate,
    formatter: ReturnFormatter,
}

impl ReturnRule {
    /// Creates a rule from a predicate and a formatter.
    pub fn new<P, F>(predicate: P, formatter: F) -> Self
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            formatter: Arc::new(formatter),
        }
    }

    /// Renders named fields when `predicate` holds.
    pub fn fields<P, I, N, S>(predicate: P, fields: I) -> Self
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let fields: Vec<ReturnField> = fields
            .into_iter()
            .map(|(name, path)| ReturnField::new(name, path))
            .collect();
        Self::new(predicate, move |value| render_fields(value, &fields))
    }

    /// Renders the whole value when `predicate` holds.
    pub fn whole<P>(predicate: P) -> Self
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(predicate, |value| Some(format_for_log(Some(value), None)))
    }

    /// Returns true if the rule applies to `value`.
    pub fn matches(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    /// Renders `value` with the rule's formatter.
    pub fn render(&self, value: &Value) -> Option<String> {
        (self.formatter)(value)
    }
}

impl fmt::Debug for ReturnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReturnRule").finish_non_exhaustive()
    }
}

/// How a return value is rendered after `RETURNED ... WITH`.
///
/// ```rust
/// use call_logging::ReturnFormat;
/// use serde_json::json;
///
/// let format = ReturnFormat::fields([("id", "user.id"), ("missing", "user.nope")]);
/// let rendered = format.render(&json!({ "user": { "id": 7 } }));
/// assert_eq!(rendered.as_deref(), Some("id=7"));
/// ```
#[derive(Clone, Default)]
pub enum ReturnFormat {
    /// The line has no `WITH` clause.
    #[default]
    Nothing,
    /// The whole value, after the filter.
    Whole(FieldFilter),
    /// Named paths; paths that do not resolve are omitted.
    Fields(Vec<ReturnField>),
    /// The first rule whose predicate holds renders the value. When none
    /// matches, `fallback` selects between the whole value and nothing.
    Rules {
        /// Rules in priority order.
        rules: Vec<ReturnRule>,
        /// Render the whole value when no rule matches.
        fallback: bool,
    },
}

impl ReturnFormat {
    /// Renders the whole value.
    pub fn whole() -> Self {
        ReturnFormat::Whole(FieldFilter::new())
    }

    /// Renders named paths of the value.
    pub fn fields<I, N, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        ReturnFormat::Fields(
            fields
                .into_iter()
                .map(|(name, path)| ReturnField::new(name, path))
                .collect(),
        )
    }

    /// Renders through the first matching rule.
    pub fn rules(rules: impl IntoIterator<Item = ReturnRule>, fallback: bool) -> Self {
        ReturnFormat::Rules {
            rules: rules.into_iter().collect(),
            fallback,
        }
    }

    /// Returns true for [`ReturnFormat::Nothing`].
    pub fn is_nothing(&self) -> bool {
        matches!(self, ReturnFormat::Nothing)
    }

    /// Renders `value`; None means the line carries no `WITH` clause.
    pub fn render(&self, value: &Value) -> Option<String> {
        match self {
            ReturnFormat::Nothing => None,
            ReturnFormat::Whole(filter) => Some(format_for_log(Some(value), Some(filter))),
            ReturnFormat::Fields(fields) => render_fields(value, fields),
            ReturnFormat::Rules { rules, fallback } => {
                match rules.iter().find(|rule| rule.matches(value)) {
                    Some(rule) => rule.render(value),
                    None if *fallback => Some(format_for_log(Some(value), None)),
                    None => None,
                }
            }
        }
    }
}

impl fmt::Debug for ReturnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnFormat::Nothing => f.write_str("Nothing"),
            ReturnFormat::Whole(filter) => f.debug_tuple("Whole").field(filter).finish(),
            ReturnFormat::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            ReturnFormat::Rules { rules, fallback } => f
                .debug_struct("Rules")
                .field("rules", &rules.len())
                .field("fallback", fallback)
                .finish(),
        }
    }
}

fn render_fields(value: &Value, fields: &[ReturnField]) -> Option<String> {
    let rendered: Vec<String> = fields
        .iter()
        .filter_map(|field| {
            resolve_path(value, &field.path)
                .map(|found| format!("{}={}", field.name, format_for_log(Some(found), None)))
        })
        .collect();

    if rendered.is_empty() {
        None
    } else {
        Some(rendered.join(FIELD_SEPARATOR))
    }
}
