//! Decides which conditional question blocks are currently revealed.
//!
//! Nothing is cached: the effective question list is recomputed from the
//! answers on every call, so changing an earlier answer can hide questions
//! that were visible before.

use dossier_types::{AnswerValue, Condition, ConditionOperator, ModuleDefinition, Question};
use std::collections::HashMap;

#[cfg(test)]
mod tests;

/// Latest answer value per question id, across every module of a project.
pub type AnswerMap = HashMap<String, AnswerValue>;

/// Evaluates a block condition against the collected answers.
///
/// A question without an answer equals nothing, so `not_equals` holds for
/// it. `contains` only looks inside array answers and is false otherwise.
pub fn condition_holds(condition: &Condition, answers: &AnswerMap) -> bool {
    let answer = answers.get(&condition.question_id);

    match condition.operator {
        ConditionOperator::Equals => answer == Some(&condition.value),
        ConditionOperator::NotEquals => answer != Some(&condition.value),
        ConditionOperator::Contains => match (answer, &condition.value) {
            (Some(AnswerValue::TextArray(entries)), AnswerValue::Text(needle)) => {
                entries.iter().any(|entry| entry == needle)
            }
            _ => false,
        },
    }
}

/// Base questions followed by the questions of every block whose condition
/// currently holds, in declaration order.
pub fn effective_questions<'a>(module: &'a ModuleDefinition, answers: &AnswerMap) -> Vec<&'a Question> {
    let revealed = module
        .conditional_blocks
        .iter()
        .filter(|block| condition_holds(&block.condition, answers))
        .flat_map(|block| block.questions.iter());

    module.questions.iter().chain(revealed).collect()
}
