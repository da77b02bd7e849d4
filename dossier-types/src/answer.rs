use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix of multi-value entries that carry free-text elaboration for a
/// selected option instead of a selection of their own.
///
/// Kept for compatibility with stored answers; new callers should read
/// array answers through [`AnswerValue::selection`].
pub const ELABORATION_MARKER: &str = "__precision__:";

/// Value of an answer as submitted by the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    TextArray(Vec<String>),
    Number(f64),
    Boolean(bool),
}

/// Structured view of a multi-value answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub selected: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elaboration: Option<String>,
}

fn is_marker(entry: &str) -> bool {
    entry.starts_with(ELABORATION_MARKER)
}

impl AnswerValue {
    pub fn text<S: Into<String>>(value: S) -> Self {
        Self::Text(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::TextArray(values.into_iter().map(Into::into).collect())
    }

    /// Whether this value counts as an answer.
    ///
    /// Blank text is not meaningful, and neither is an array holding only
    /// elaboration entries.
    pub fn is_meaningful(&self) -> bool {
        match self {
            AnswerValue::Text(text) => !text.trim().is_empty(),
            AnswerValue::TextArray(entries) => entries
                .iter()
                .any(|entry| !is_marker(entry) && !entry.trim().is_empty()),
            AnswerValue::Number(_) => true,
            AnswerValue::Boolean(_) => true,
        }
    }

    /// Real selections of an array answer, elaboration entries removed.
    pub fn selected_entries(&self) -> Vec<&str> {
        match self {
            AnswerValue::TextArray(entries) => entries
                .iter()
                .filter(|entry| !is_marker(entry))
                .map(String::as_str)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        let AnswerValue::TextArray(entries) = self else {
            return None;
        };

        let elaboration: Vec<&str> = entries
            .iter()
            .filter_map(|entry| entry.strip_prefix(ELABORATION_MARKER))
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .collect();

        Some(Selection {
            selected: self
                .selected_entries()
                .into_iter()
                .map(str::to_string)
                .collect(),
            elaboration: if elaboration.is_empty() {
                None
            } else {
                Some(elaboration.join("\n"))
            },
        })
    }

    /// Plain string form used for generation context summaries.
    pub fn to_plain_string(&self) -> String {
        match self {
            AnswerValue::Text(text) => text.clone(),
            AnswerValue::TextArray(_) => self.selected_entries().join(", "),
            AnswerValue::Number(number) => number.to_string(),
            AnswerValue::Boolean(flag) => flag.to_string(),
        }
    }

    /// String form substituted into prompt templates. Booleans are rendered
    /// in French.
    pub fn to_prompt_string(&self) -> String {
        match self {
            AnswerValue::Boolean(true) => "Oui".to_string(),
            AnswerValue::Boolean(false) => "Non".to_string(),
            other => other.to_plain_string(),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub question_label: String,
    pub value: AnswerValue,
    pub answered_at: DateTime<Utc>,
}

/// Entry of the project-wide flattened answer map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatAnswer {
    pub question_label: String,
    pub string_value: String,
}
