//! Wizard pointer bookkeeping and first-time setup of a project.

use crate::answers::section_entry;
use chrono::{DateTime, Utc};
use dossier_types::{LegacyField, ModuleDefinition, Project, WizardState};

/// Creates the wizard state and one section per module where missing.
///
/// Sections of modules that mirror a legacy column start from that column's
/// text. Existing state and sections are left as they are. Returns whether
/// anything was added.
pub fn initialize(project: &mut Project, modules: &[ModuleDefinition], now: DateTime<Utc>) -> bool {
    let mut changed = false;

    if project.wizard_state.is_none() {
        project.wizard_state = Some(WizardState::new(now));
        changed = true;
    }

    for module in modules {
        if project.section(&module.id).is_some() {
            continue;
        }

        let seed = LegacyField::for_module(&module.id)
            .and_then(|field| project.legacy_field(field))
            .map(str::to_string);
        let section = section_entry(project, module);
        if let Some(content) = seed {
            section.content = content;
        }
        changed = true;
    }

    if let Some(state) = project.wizard_state.as_mut() {
        for module in modules {
            if !state.modules.contains_key(&module.id) {
                state.module_mut(&module.id);
                changed = true;
            }
        }
    }

    if changed {
        project.updated_at = now;
    }
    changed
}

/// Moves the pointer. Indices are not checked against the catalog.
pub fn navigate(
    state: &mut WizardState,
    module_index: usize,
    question_index: Option<usize>,
    now: DateTime<Utc>,
) {
    state.current_module = module_index;
    state.current_question = question_index.unwrap_or(0);
    state.last_activity_at = now;
}
