use dossier_types::{
    AnswerValue, ChoiceOption, Condition, ConditionOperator, ConditionalBlock, ModuleDefinition,
    Question, QuestionKind,
};

fn options(pairs: &[(&str, &str)]) -> Vec<ChoiceOption> {
    pairs
        .iter()
        .map(|(value, label)| ChoiceOption::new(*value, *label))
        .collect()
}

fn with_other(mut question: Question) -> Question {
    match &mut question.kind {
        QuestionKind::Radio { allow_other, .. }
        | QuestionKind::Checkbox { allow_other, .. }
        | QuestionKind::SelectOrText { allow_other, .. } => *allow_other = true,
        _ => {}
    }
    question
}

fn number(id: &str, label: &str, min: Option<f64>, unit: Option<&str>) -> Question {
    Question {
        id: id.to_string(),
        label: label.to_string(),
        required: false,
        hint: None,
        kind: QuestionKind::Number {
            min,
            max: None,
            unit: unit.map(str::to_string),
        },
    }
}

fn when(question_id: &str, operator: ConditionOperator, value: &str) -> Condition {
    Condition {
        question_id: question_id.to_string(),
        operator,
        value: AnswerValue::text(value),
    }
}

fn yes_no() -> Vec<ChoiceOption> {
    options(&[("oui", "Oui"), ("non", "Non")])
}

pub(super) fn modules() -> Vec<ModuleDefinition> {
    vec![contexte(), objectifs(), solution(), contraintes(), budget_planning()]
}

fn contexte() -> ModuleDefinition {
    ModuleDefinition {
        id: "contexte".to_string(),
        title: "Contexte de la demande".to_string(),
        questions: vec![
            Question::text("service_demandeur", "Quel service porte la demande ?").required(),
            Question::textarea(
                "situation_actuelle",
                "Comment l'activité est-elle organisée aujourd'hui ?",
            )
            .required()
            .with_hint("Décrivez les outils, les personnes impliquées et les volumes traités."),
            with_other(Question::checkbox(
                "difficultes",
                "Quelles difficultés rencontrez-vous ?",
                options(&[
                    ("delais", "Délais de traitement trop longs"),
                    ("erreurs", "Erreurs ou ressaisies fréquentes"),
                    ("cout", "Coûts de fonctionnement élevés"),
                    ("outils_obsoletes", "Outils obsolètes ou non maintenus"),
                    ("charge", "Charge de travail excessive"),
                ]),
            )),
        ],
        conditional_blocks: vec![],
        prompt_template: Some(
            "Rédige la partie « Contexte » d'un dossier de demande pour un besoin de type \
             {need_type}, porté par {department} (urgence : {urgency}).\n\
             Service demandeur : {service_demandeur}\n\
             Organisation actuelle : {situation_actuelle}\n\
             Difficultés constatées : {difficultes}\n\
             {conditional_answers}\n\
             Rédige deux à trois paragraphes factuels, sans titre."
                .to_string(),
        ),
    }
}

fn objectifs() -> ModuleDefinition {
    ModuleDefinition {
        id: "objectifs".to_string(),
        title: "Objectifs".to_string(),
        questions: vec![
            Question::textarea("objectif_principal", "Quel est l'objectif principal ?").required(),
            Question::checkbox(
                "benefices",
                "Quels bénéfices attendez-vous ?",
                options(&[
                    ("gain_temps", "Gain de temps"),
                    ("qualite", "Meilleure qualité de service"),
                    ("conformite", "Mise en conformité"),
                    ("satisfaction", "Satisfaction des usagers"),
                    ("economies", "Économies"),
                ]),
            ),
            Question::textarea("indicateurs", "Comment mesurerez-vous la réussite ?")
                .with_hint("Par exemple : délai moyen de traitement, taux de réclamations."),
        ],
        conditional_blocks: vec![],
        prompt_template: Some(
            "Rédige la partie « Objectifs » d'un dossier de demande ({need_type}, {department}).\n\
             Objectif principal : {objectif_principal}\n\
             Bénéfices attendus : {benefices}\n\
             Indicateurs de réussite : {indicateurs}\n\
             {conditional_answers}\n\
             Présente les objectifs sous forme de liste puis un paragraphe sur les indicateurs."
                .to_string(),
        ),
    }
}

fn solution() -> ModuleDefinition {
    ModuleDefinition {
        id: "solution".to_string(),
        title: "Description du besoin".to_string(),
        questions: vec![
            Question::radio(
                "need_type",
                "De quel type de besoin s'agit-il ?",
                options(&[
                    ("logiciel", "Logiciel ou application"),
                    ("materiel", "Matériel"),
                    ("prestation", "Prestation de service"),
                    ("travaux", "Travaux"),
                ]),
            )
            .required(),
            Question::textarea("description_besoin", "Décrivez le besoin en quelques phrases.")
                .required(),
        ],
        conditional_blocks: vec![
            ConditionalBlock {
                condition: when("need_type", ConditionOperator::Equals, "logiciel"),
                questions: vec![
                    number("nb_utilisateurs", "Combien d'utilisateurs ?", Some(1.0), None),
                    with_other(Question::radio(
                        "hebergement",
                        "Quel hébergement envisagez-vous ?",
                        options(&[
                            ("cloud", "Hébergement externe (SaaS)"),
                            ("on_premise", "Dans nos locaux"),
                            ("indifferent", "Indifférent"),
                        ]),
                    )),
                    with_other(Question::checkbox(
                        "interfaces",
                        "Avec quels outils existants la solution doit-elle échanger ?",
                        options(&[
                            ("messagerie", "Messagerie"),
                            ("finances", "Logiciel financier"),
                            ("annuaire", "Annuaire des agents"),
                            ("sig", "Système d'information géographique"),
                        ]),
                    )),
                ],
            },
            ConditionalBlock {
                condition: when("need_type", ConditionOperator::Equals, "materiel"),
                questions: vec![
                    number("quantite", "Quelle quantité ?", Some(1.0), None),
                    Question::radio("garantie_etendue", "Une garantie étendue est-elle requise ?", yes_no()),
                ],
            },
            ConditionalBlock {
                condition: when("need_type", ConditionOperator::Equals, "prestation"),
                questions: vec![Question::text(
                    "duree_prestation",
                    "Quelle est la durée de la prestation ?",
                )],
            },
        ],
        prompt_template: Some(
            "Rédige la partie « Description du besoin » d'un dossier de demande porté par \
             {department}.\n\
             Type de besoin : {need_type}\n\
             Description : {description_besoin}\n\
             {conditional_answers}\n\
             Décris le besoin fonctionnel sans citer de marque ni de produit."
                .to_string(),
        ),
    }
}

fn contraintes() -> ModuleDefinition {
    ModuleDefinition {
        id: "contraintes".to_string(),
        title: "Contraintes".to_string(),
        questions: vec![
            Question {
                id: "echeance".to_string(),
                label: "Pour quand la solution doit-elle être opérationnelle ?".to_string(),
                required: true,
                hint: None,
                kind: QuestionKind::Date {
                    min_date: None,
                    max_date: None,
                },
            },
            with_other(Question::checkbox(
                "contraintes_reglementaires",
                "Quelles contraintes réglementaires s'appliquent ?",
                options(&[
                    ("rgpd", "Données personnelles (RGPD)"),
                    ("accessibilite", "Accessibilité (RGAA)"),
                    ("securite", "Sécurité des systèmes d'information"),
                    ("archivage", "Archivage réglementaire"),
                ]),
            )),
            Question::textarea("contraintes_techniques", "Y a-t-il des contraintes techniques ?"),
        ],
        conditional_blocks: vec![ConditionalBlock {
            condition: when("contraintes_reglementaires", ConditionOperator::Contains, "rgpd"),
            questions: vec![Question::radio(
                "dpo_consulte",
                "Le délégué à la protection des données a-t-il été consulté ?",
                yes_no(),
            )],
        }],
        prompt_template: Some(
            "Rédige la partie « Contraintes » d'un dossier de demande (urgence : {urgency}).\n\
             Échéance : {echeance}\n\
             Contraintes réglementaires : {contraintes_reglementaires}\n\
             Contraintes techniques : {contraintes_techniques}\n\
             {conditional_answers}\n\
             Classe les contraintes par nature."
                .to_string(),
        ),
    }
}

fn budget_planning() -> ModuleDefinition {
    ModuleDefinition {
        id: "budget_planning".to_string(),
        title: "Budget et planning".to_string(),
        questions: vec![
            number("budget_estime", "Quel budget estimez-vous ?", Some(0.0), Some("€ HT")),
            Question::radio(
                "financement",
                "Comment le projet est-il financé ?",
                options(&[
                    ("budget_service", "Budget du service"),
                    ("subvention", "Subvention"),
                    ("mutualise", "Financement mutualisé"),
                    ("a_definir", "À définir"),
                ]),
            ),
            Question::textarea("jalons", "Quelles sont les grandes étapes prévues ?"),
        ],
        conditional_blocks: vec![ConditionalBlock {
            condition: when("financement", ConditionOperator::Equals, "subvention"),
            questions: vec![Question::text("organisme_financeur", "Quel organisme finance ?")],
        }],
        prompt_template: Some(
            "Rédige la partie « Budget et planning » d'un dossier de demande.\n\
             Budget estimé (€ HT) : {budget_estime}\n\
             Financement : {financement}\n\
             Étapes prévues : {jalons}\n\
             {conditional_answers}\n\
             Présente le planning sous forme de jalons datés lorsque c'est possible."
                .to_string(),
        ),
    }
}
