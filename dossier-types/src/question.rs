use crate::answer::AnswerValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single question shown by the wizard.
///
/// The common fields live on the struct; the `type` discriminator and the
/// type-specific bounds are flattened in from [`QuestionKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    pub fn text<S: Into<String>>(id: S, label: S) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            required: false,
            hint: None,
            kind: QuestionKind::Text {
                min_length: None,
                max_length: None,
            },
        }
    }

    pub fn textarea<S: Into<String>>(id: S, label: S) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            required: false,
            hint: None,
            kind: QuestionKind::Textarea {
                min_length: None,
                max_length: None,
            },
        }
    }

    pub fn radio<S: Into<String>>(id: S, label: S, options: Vec<ChoiceOption>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            required: false,
            hint: None,
            kind: QuestionKind::Radio {
                options,
                allow_other: false,
            },
        }
    }

    pub fn checkbox<S: Into<String>>(id: S, label: S, options: Vec<ChoiceOption>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            required: false,
            hint: None,
            kind: QuestionKind::Checkbox {
                options,
                allow_other: false,
                min_select: None,
                max_select: None,
            },
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_hint<S: Into<String>>(mut self, hint: S) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Options offered by choice-type questions, empty for free-form ones.
    pub fn options(&self) -> &[ChoiceOption] {
        match &self.kind {
            QuestionKind::Radio { options, .. }
            | QuestionKind::Checkbox { options, .. }
            | QuestionKind::SelectOrText { options, .. } => options,
            QuestionKind::Text { .. }
            | QuestionKind::Textarea { .. }
            | QuestionKind::Number { .. }
            | QuestionKind::Date { .. } => &[],
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            QuestionKind::Text { .. } => "text",
            QuestionKind::Textarea { .. } => "textarea",
            QuestionKind::Radio { .. } => "radio",
            QuestionKind::Checkbox { .. } => "checkbox",
            QuestionKind::SelectOrText { .. } => "select_or_text",
            QuestionKind::Number { .. } => "number",
            QuestionKind::Date { .. } => "date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum QuestionKind {
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<u32>,
    },
    Textarea {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<u32>,
    },
    Radio {
        options: Vec<ChoiceOption>,
        #[serde(default)]
        allow_other: bool,
    },
    Checkbox {
        options: Vec<ChoiceOption>,
        #[serde(default)]
        allow_other: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_select: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_select: Option<u32>,
    },
    SelectOrText {
        options: Vec<ChoiceOption>,
        #[serde(default)]
        allow_other: bool,
    },
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    Date {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_date: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_date: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ChoiceOption {
    pub fn new<S: Into<String>>(value: S, label: S) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    Contains,
    NotEquals,
}

/// Predicate over a previously collected answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub question_id: String,
    pub operator: ConditionOperator,
    pub value: AnswerValue,
}

/// Extra questions appended to a module while `condition` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalBlock {
    pub condition: Condition,
    pub questions: Vec<Question>,
}
