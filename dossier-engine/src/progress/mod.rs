use crate::conditions::{effective_questions, AnswerMap};
use dossier_types::{ModuleDefinition, ModuleProgress, OverallProgress, Project};
use std::collections::HashSet;


/// Rounded percentage, 0 when there is nothing to answer.
pub fn percentage(answered: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((answered as f64 * 100.0) / total as f64).round().min(100.0) as u8
}

/// Progress of one module against its currently effective questions.
///
/// The total moves with the answers: revealing a conditional block adds its
/// questions, and answered ids that are no longer effective do not count.
pub fn module_progress(
    project: &Project,
    module: &ModuleDefinition,
    answers: &AnswerMap,
) -> ModuleProgress {
    let effective: HashSet<&str> = effective_questions(module, answers)
        .into_iter()
        .map(|q| q.id.as_str())
        .collect();

    let state = project
        .wizard_state
        .as_ref()
        .and_then(|s| s.module(&module.id));

    let answered = state
        .map(|s| {
            s.answered_questions
                .iter()
                .filter(|id| effective.contains(id.as_str()))
                .count()
        })
        .unwrap_or(0);

    ModuleProgress {
        module_id: module.id.clone(),
        answered,
        total: effective.len(),
        progress: percentage(answered, effective.len()),
        status: state.map(|s| s.status).unwrap_or_default(),
    }
}

/// Unweighted mean of the module percentages, so a two-question module
/// weighs as much as a twenty-question one.
pub fn overall_progress(
    project: &Project,
    modules: &[ModuleDefinition],
    answers: &AnswerMap,
) -> OverallProgress {
    let modules: Vec<ModuleProgress> = modules
        .iter()
        .map(|module| module_progress(project, module, answers))
        .collect();

    let progress = if modules.is_empty() {
        0
    } else {
        let sum: u32 = modules.iter().map(|m| m.progress as u32).sum();
        (sum as f64 / modules.len() as f64).round() as u8
    };

    OverallProgress { progress, modules }
}
