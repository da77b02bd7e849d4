use super::*;
use serde_json::json;

#[test]
fn test_question_deserializes_type_tag_and_bounds() {
    let question: Question = serde_json::from_value(json!({
        "id": "team_size",
        "label": "Taille de l'équipe",
        "type": "number",
        "required": true,
        "min": 1,
        "max": 500
    }))
    .unwrap();

    assert_eq!(question.id, "team_size");
    assert!(question.required);
    assert_eq!(question.type_name(), "number");
    match question.kind {
        QuestionKind::Number { min, max, unit } => {
            assert_eq!(min, Some(1.0));
            assert_eq!(max, Some(500.0));
            assert!(unit.is_none());
        }
        other => panic!("unexpected kind {:?}", other),
    }
}

#[test]
fn test_checkbox_question_uses_camel_case_fields() {
    let question = Question {
        id: "features".to_string(),
        label: "Fonctionnalités".to_string(),
        required: false,
        hint: None,
        kind: QuestionKind::Checkbox {
            options: vec![ChoiceOption::new("export", "Export")],
            allow_other: true,
            min_select: Some(1),
            max_select: None,
        },
    };

    let value = serde_json::to_value(&question).unwrap();
    assert_eq!(value["type"], "checkbox");
    assert_eq!(value["allowOther"], true);
    assert_eq!(value["minSelect"], 1);
    assert!(value.get("maxSelect").is_none());
    assert_eq!(question.options().len(), 1);
}

#[test]
fn test_answer_value_untagged_variants() {
    let text: AnswerValue = serde_json::from_value(json!("logiciel")).unwrap();
    let list: AnswerValue = serde_json::from_value(json!(["a", "b"])).unwrap();
    let number: AnswerValue = serde_json::from_value(json!(12)).unwrap();
    let flag: AnswerValue = serde_json::from_value(json!(false)).unwrap();

    assert_eq!(text, AnswerValue::text("logiciel"));
    assert_eq!(list, AnswerValue::list(["a", "b"]));
    assert_eq!(number, AnswerValue::Number(12.0));
    assert_eq!(flag, AnswerValue::Boolean(false));
}

#[test]
fn test_marker_only_array_is_not_meaningful() {
    let marker_only = AnswerValue::list([format!("{}détail libre", ELABORATION_MARKER)]);
    assert!(!marker_only.is_meaningful());

    let with_selection = AnswerValue::list([
        "cloud".to_string(),
        format!("{}hébergement souverain", ELABORATION_MARKER),
    ]);
    assert!(with_selection.is_meaningful());

    assert!(!AnswerValue::text("   ").is_meaningful());
    assert!(!AnswerValue::list(Vec::<String>::new()).is_meaningful());
    assert!(AnswerValue::Boolean(false).is_meaningful());
    assert!(AnswerValue::Number(0.0).is_meaningful());
}

#[test]
fn test_selection_splits_elaboration() {
    let value = AnswerValue::list([
        "cloud".to_string(),
        "on_premise".to_string(),
        format!("{} hébergement souverain ", ELABORATION_MARKER),
    ]);

    let selection = value.selection().unwrap();
    assert_eq!(selection.selected, vec!["cloud", "on_premise"]);
    assert_eq!(selection.elaboration.as_deref(), Some("hébergement souverain"));
    assert!(AnswerValue::text("x").selection().is_none());
}

#[test]
fn test_string_forms() {
    let list = AnswerValue::list(["a".to_string(), format!("{}x", ELABORATION_MARKER), "b".to_string()]);
    assert_eq!(list.to_plain_string(), "a, b");
    assert_eq!(AnswerValue::Number(3.0).to_plain_string(), "3");
    assert_eq!(AnswerValue::Number(2.5).to_plain_string(), "2.5");
    assert_eq!(AnswerValue::Boolean(true).to_plain_string(), "true");
    assert_eq!(AnswerValue::Boolean(true).to_prompt_string(), "Oui");
    assert_eq!(AnswerValue::Boolean(false).to_prompt_string(), "Non");
}

#[test]
fn test_conditional_block_roundtrip_shape() {
    let block: ConditionalBlock = serde_json::from_value(json!({
        "condition": { "questionId": "need_type", "operator": "not_equals", "value": "service" },
        "questions": [ { "id": "stack", "label": "Stack", "type": "text" } ]
    }))
    .unwrap();

    assert_eq!(block.condition.operator, ConditionOperator::NotEquals);
    assert_eq!(block.condition.value, AnswerValue::text("service"));
    assert_eq!(block.questions[0].type_name(), "text");
}

#[test]
fn test_legacy_field_mapping() {
    assert_eq!(LegacyField::for_module("contexte"), Some(LegacyField::Context));
    assert_eq!(LegacyField::for_module("objectifs"), Some(LegacyField::Objectives));
    assert_eq!(LegacyField::for_module("contraintes"), Some(LegacyField::Constraints));
    assert_eq!(LegacyField::for_module("budget_planning"), None);

    let mut project = Project::new("owner", "Dossier");
    project.set_legacy_field(LegacyField::Objectives, "Réduire les délais".to_string());
    assert_eq!(project.objectives.as_deref(), Some("Réduire les délais"));
    assert_eq!(project.legacy_field(LegacyField::Objectives), Some("Réduire les délais"));
}

#[test]
fn test_choice_session_label_lookup_ignores_case() {
    let mut session = ChoiceSession::new("p", "m", "q", "Question", 3);
    session.choices.push(GuidedChoice::new("Portail usager", ChoiceSource::Ai));
    assert!(session.contains_label("  portail USAGER"));
    assert!(!session.contains_label("Autre"));
    assert!(session.can_generate_more());
    assert!(session.selected_labels().is_empty());
}

#[test]
fn test_message_type_serializes_as_type() {
    let message = AssistantMessage::assistant("Question ?", MessageType::Question);
    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(value["type"], "question");
    assert_eq!(value["role"], "assistant");
}
