//! `{placeholder}` templates rendered from a map of values.
//!
//! A template is parsed into literal and placeholder segments once, then
//! rendered in a single pass, so one placeholder name being a prefix of
//! another (`{budget}` / `{budget_max}`) cannot cause partial replacement,
//! and substituted values are never scanned again.

use dossier_types::{Answer, Project};
use std::collections::HashMap;


/// Placeholder that used to receive conditional answers. It always renders
/// empty; conditional answers are reachable through their own `{questionId}`.
pub const CONDITIONAL_ANSWERS: &str = "conditional_answers";
pub const NEED_TYPE: &str = "need_type";
pub const DEPARTMENT: &str = "department";
pub const URGENCY: &str = "urgency";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            match after.find('}') {
                Some(close) if is_placeholder_name(&after[..close]) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(after[..close].to_string()));
                    rest = &after[close + 1..];
                }
                _ => {
                    literal.push('{');
                    rest = after;
                }
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Placeholders without a value are kept verbatim.
    pub fn render(&self, values: &HashMap<String, String>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => match values.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                },
            }
        }
        out
    }
}

/// Values substituted into a module prompt template.
///
/// Project tokens come first, `{conditional_answers}` is blanked, and each
/// answer then fills `{questionId}`, taking precedence over a project token
/// of the same name.
pub fn prompt_values(answers: &[Answer], project: &Project) -> HashMap<String, String> {
    let mut values = HashMap::new();
    values.insert(NEED_TYPE.to_string(), project.need_type.clone().unwrap_or_default());
    values.insert(DEPARTMENT.to_string(), project.department.clone().unwrap_or_default());
    values.insert(URGENCY.to_string(), project.urgency.clone().unwrap_or_default());
    values.insert(CONDITIONAL_ANSWERS.to_string(), String::new());

    for answer in answers {
        if answer.question_id == CONDITIONAL_ANSWERS {
            continue;
        }
        values.insert(answer.question_id.clone(), answer.value.to_prompt_string());
    }
    values
}

/// Builds the generation instruction of a module from its template.
pub fn assemble_prompt(template: &str, answers: &[Answer], project: &Project) -> String {
    Template::parse(template).render(&prompt_values(answers, project))
}
