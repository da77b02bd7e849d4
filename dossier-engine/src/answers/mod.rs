//! Per-module answer lists stored on the project sections.

use crate::conditions::AnswerMap;
use chrono::{DateTime, Utc};
use dossier_types::{
    Answer, AnswerValue, FlatAnswer, ModuleDefinition, ModuleStatus, Project, Section,
    WizardState,
};
use std::collections::BTreeMap;


/// Section of `module`, created empty if the project does not have one yet.
pub fn section_entry<'a>(project: &'a mut Project, module: &ModuleDefinition) -> &'a mut Section {
    if let Some(index) = project.sections.iter().position(|s| s.id == module.id) {
        &mut project.sections[index]
    } else {
        project
            .sections
            .push(Section::new(module.id.as_str(), module.title.as_str()));
        let last = project.sections.len() - 1;
        &mut project.sections[last]
    }
}

/// Upserts an answer and keeps the module's answered list in sync.
///
/// The question id is listed as answered iff the new value is meaningful.
/// The module moves between pending and in progress accordingly, but a
/// validated module stays completed.
pub fn save_answer(
    project: &mut Project,
    module: &ModuleDefinition,
    question_id: &str,
    question_label: &str,
    value: AnswerValue,
    now: DateTime<Utc>,
) -> Answer {
    let meaningful = value.is_meaningful();
    let answer = Answer {
        question_id: question_id.to_string(),
        question_label: question_label.to_string(),
        value,
        answered_at: now,
    };

    let section = section_entry(project, module);
    match section
        .answers
        .iter_mut()
        .find(|a| a.question_id == question_id)
    {
        Some(existing) => *existing = answer.clone(),
        None => section.answers.push(answer.clone()),
    }

    let state = project
        .wizard_state
        .get_or_insert_with(|| WizardState::new(now));
    state.last_activity_at = now;

    let module_state = state.module_mut(&module.id);
    let listed = module_state
        .answered_questions
        .iter()
        .position(|id| id == question_id);
    match (meaningful, listed) {
        (true, None) => module_state
            .answered_questions
            .push(question_id.to_string()),
        (false, Some(index)) => {
            module_state.answered_questions.remove(index);
        }
        _ => {}
    }

    if module_state.status != ModuleStatus::Completed {
        if module_state.answered_questions.is_empty() {
            module_state.status = ModuleStatus::Pending;
        } else {
            module_state.status = ModuleStatus::InProgress;
            module_state.started_at.get_or_insert(now);
        }
    }

    project.updated_at = now;
    answer
}

pub fn module_answers<'a>(project: &'a Project, module_id: &str) -> &'a [Answer] {
    project
        .section(module_id)
        .map(|s| s.answers.as_slice())
        .unwrap_or(&[])
}

/// Latest value of every answer in the project, keyed by question id.
pub fn answer_map(project: &Project) -> AnswerMap {
    project
        .sections
        .iter()
        .flat_map(|s| s.answers.iter())
        .map(|a| (a.question_id.clone(), a.value.clone()))
        .collect()
}

/// Every meaningful answer flattened to label and display string, for use
/// as generation context. Elaboration entries are dropped from arrays.
pub fn flat_answers(project: &Project) -> BTreeMap<String, FlatAnswer> {
    project
        .sections
        .iter()
        .flat_map(|s| s.answers.iter())
        .filter(|a| a.value.is_meaningful())
        .map(|a| {
            (
                a.question_id.clone(),
                FlatAnswer {
                    question_label: a.question_label.clone(),
                    string_value: a.value.to_plain_string(),
                },
            )
        })
        .collect()
}

/// Human readable "label: value" lines of [`flat_answers`].
pub fn answers_summary(project: &Project) -> String {
    flat_answers(project)
        .values()
        .map(|a| format!("- {} : {}", a.question_label, a.string_value))
        .collect::<Vec<_>>()
        .join("\n")
}
