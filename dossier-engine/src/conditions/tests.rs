use super::*;
use dossier_types::{ConditionalBlock, ModuleDefinition, Question};

fn condition(question_id: &str, operator: ConditionOperator, value: AnswerValue) -> Condition {
    Condition {
        question_id: question_id.to_string(),
        operator,
        value,
    }
}

fn module_with_block(operator: ConditionOperator, value: AnswerValue) -> ModuleDefinition {
    ModuleDefinition {
        id: "solution".to_string(),
        title: "Solution".to_string(),
        questions: vec![
            Question::text("need_type", "Type de besoin"),
            Question::textarea("description", "Description"),
        ],
        conditional_blocks: vec![ConditionalBlock {
            condition: condition("need_type", operator, value),
            questions: vec![Question::text("tech_stack", "Technologies")],
        }],
        prompt_template: None,
    }
}

fn answers(pairs: &[(&str, AnswerValue)]) -> AnswerMap {
    pairs
        .iter()
        .map(|(id, value)| (id.to_string(), value.clone()))
        .collect()
}

#[test]
fn test_equals_reveals_block_only_when_matching() {
    let module = module_with_block(ConditionOperator::Equals, AnswerValue::text("logiciel"));

    let none = effective_questions(&module, &AnswerMap::new());
    assert_eq!(none.len(), 2);

    let matching = answers(&[("need_type", AnswerValue::text("logiciel"))]);
    let ids: Vec<&str> = effective_questions(&module, &matching)
        .iter()
        .map(|q| q.id.as_str())
        .collect();
    assert_eq!(ids, vec!["need_type", "description", "tech_stack"]);

    let other = answers(&[("need_type", AnswerValue::text("service"))]);
    assert_eq!(effective_questions(&module, &other).len(), 2);
}

#[test]
fn test_effective_questions_follow_answer_changes() {
    let module = module_with_block(ConditionOperator::Equals, AnswerValue::text("logiciel"));
    let mut map = answers(&[("need_type", AnswerValue::text("logiciel"))]);
    assert_eq!(effective_questions(&module, &map).len(), 3);

    map.insert("need_type".to_string(), AnswerValue::text("travaux"));
    assert_eq!(effective_questions(&module, &map).len(), 2);
}

#[test]
fn test_not_equals_holds_for_missing_answer() {
    let module = module_with_block(ConditionOperator::NotEquals, AnswerValue::text("service"));
    assert_eq!(effective_questions(&module, &AnswerMap::new()).len(), 3);

    let same = answers(&[("need_type", AnswerValue::text("service"))]);
    assert_eq!(effective_questions(&module, &same).len(), 2);
}

#[test]
fn test_contains_only_applies_to_arrays() {
    let contains = condition("channels", ConditionOperator::Contains, AnswerValue::text("mobile"));

    let array = answers(&[("channels", AnswerValue::list(["web", "mobile"]))]);
    assert!(condition_holds(&contains, &array));

    let missing = answers(&[("channels", AnswerValue::list(["web"]))]);
    assert!(!condition_holds(&contains, &missing));

    let scalar = answers(&[("channels", AnswerValue::text("mobile"))]);
    assert!(!condition_holds(&contains, &scalar));

    let number = answers(&[("channels", AnswerValue::Number(1.0))]);
    assert!(!condition_holds(&contains, &number));
}

#[test]
fn test_equals_is_strict_on_value_kind() {
    let equals_number = condition("headcount", ConditionOperator::Equals, AnswerValue::Number(5.0));
    let as_text = answers(&[("headcount", AnswerValue::text("5"))]);
    assert!(!condition_holds(&equals_number, &as_text));

    let as_number = answers(&[("headcount", AnswerValue::Number(5.0))]);
    assert!(condition_holds(&equals_number, &as_number));
}
