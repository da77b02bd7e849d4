//! Instructions and reply contracts for every generation call.
//!
//! Replies are requested in JSON mode; the expected shape is described to
//! the model with a schema generated from the reply struct.

use crate::answers::answers_summary;
use dossier_types::{ConversationMode, ModuleDefinition, Project};
use schemars::JsonSchema;
use serde::Deserialize;

/// Project facts handed to every prompt of a generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptContext {
    pub project_title: String,
    pub need_type: String,
    pub department: String,
    pub urgency: String,
    pub module_title: String,
    pub question_label: String,
    pub collected_answers: String,
    pub section_content: String,
}

impl PromptContext {
    pub fn new(project: &Project, module: &ModuleDefinition, question_label: &str) -> Self {
        let unknown = || "non précisé".to_string();
        Self {
            project_title: project.title.clone(),
            need_type: project.need_type.clone().unwrap_or_else(unknown),
            department: project.department.clone().unwrap_or_else(unknown),
            urgency: project.urgency.clone().unwrap_or_else(unknown),
            module_title: module.title.clone(),
            question_label: question_label.to_string(),
            collected_answers: answers_summary(project),
            section_content: project
                .section(&module.id)
                .map(|s| s.content.clone())
                .unwrap_or_default(),
        }
    }

    fn describe(&self) -> String {
        let mut out = format!(
            "CONTEXTE DU DOSSIER\n\
             - Projet : {}\n\
             - Type de besoin : {}\n\
             - Service demandeur : {}\n\
             - Urgence : {}\n\
             - Rubrique : {}\n\
             - Question traitée : {}\n",
            self.project_title,
            self.need_type,
            self.department,
            self.urgency,
            self.module_title,
            self.question_label
        );
        if !self.collected_answers.is_empty() {
            out.push_str("\nRÉPONSES DÉJÀ COLLECTÉES\n");
            out.push_str(&self.collected_answers);
            out.push('\n');
        }
        if !self.section_content.trim().is_empty() {
            out.push_str("\nTEXTE ACTUEL DE LA RUBRIQUE\n");
            out.push_str(self.section_content.trim());
            out.push('\n');
        }
        out
    }
}

/// First assistant turn of a guided conversation.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpeningReply {
    /// Question posée à l'utilisateur.
    pub question: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub example: Option<String>,
}

/// Reply to one user turn of a guided conversation.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TurnReply {
    /// Texte professionnel intégrant toutes les réponses reçues jusqu'ici.
    pub integrated_text: String,
    #[serde(default)]
    pub next_question: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionItem {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub preview_text: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsReply {
    #[serde(default)]
    pub suggestions: Vec<SuggestionItem>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReply {
    pub analysis: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementReply {
    pub suggestion: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChoicesReply {
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisReply {
    pub text: String,
}

/// Instruction telling the model which JSON object to return.
pub fn reply_contract<T: JsonSchema>() -> String {
    let schema = schemars::schema_for!(T);
    let schema = serde_json::to_string_pretty(&schema).unwrap_or_default();
    format!(
        "FORMAT DE RÉPONSE\n\
         Réponds uniquement avec un objet JSON valide conforme au schéma suivant, \
         sans bloc de code Markdown ni texte autour :\n{}",
        schema
    )
}

const WRITER_ROLE: &str = "Tu es un assistant de rédaction de dossiers de demande \
préalables à un appel d'offres public. Tu écris en français, dans un registre \
professionnel, clair et factuel, sans inventer d'informations.";

/// System prompt of a conversation turn, for the given mode.
pub fn conversation_system_prompt(
    mode: ConversationMode,
    context: &PromptContext,
    generated_text: &str,
) -> String {
    let style = match mode {
        ConversationMode::Guided => {
            "MODE GUIDÉ\n\
             L'utilisateur n'est pas un expert des achats publics. Pose une seule question \
             simple à la fois, propose quelques réponses possibles et un court exemple. \
             Reformule chaque réponse dans un texte professionnel qui s'enrichit au fil \
             des échanges."
        }
        ConversationMode::Expert => {
            "MODE EXPERT\n\
             L'utilisateur maîtrise le sujet. Pose des questions précises et techniques, \
             sans exemple sauf s'il est utile. Intègre chaque réponse dans un texte dense \
             et rigoureux."
        }
    };

    let current = if generated_text.trim().is_empty() {
        "(aucun texte rédigé pour l'instant)".to_string()
    } else {
        generated_text.trim().to_string()
    };

    format!(
        "{}\n\n{}\n\n{}\nTEXTE EN COURS DE RÉDACTION\n{}\n\n\
         Quand les informations sont suffisantes pour la question traitée, indique \
         isComplete = true et nextQuestion = null.\n\n{}",
        WRITER_ROLE,
        style,
        context.describe(),
        current,
        reply_contract::<TurnReply>()
    )
}

/// System prompt asking for the opening question of a conversation.
pub fn opening_system_prompt(mode: ConversationMode, context: &PromptContext) -> String {
    let audience = match mode {
        ConversationMode::Guided => "un utilisateur non spécialiste",
        ConversationMode::Expert => "un utilisateur expert",
    };
    format!(
        "{}\n\nTu démarres un échange avec {} pour rédiger la réponse à la question \
         traitée.\n\n{}\n{}",
        WRITER_ROLE,
        audience,
        context.describe(),
        reply_contract::<OpeningReply>()
    )
}

pub const OPENING_INSTRUCTION: &str =
    "Pose la première question qui permettra de rédiger cette partie du dossier.";

pub fn suggestions_system_prompt(context: &PromptContext) -> String {
    format!(
        "{}\n\nPropose jusqu'à trois enrichissements courts qui pourraient compléter le \
         texte rédigé (précisions, indicateurs, contraintes oubliées). Chaque \
         enrichissement doit pouvoir être ajouté tel quel à la fin du texte.\n\n{}\n{}",
        WRITER_ROLE,
        context.describe(),
        reply_contract::<SuggestionsReply>()
    )
}

pub fn analysis_system_prompt(mode: ConversationMode, context: &PromptContext) -> String {
    let focus = match mode {
        ConversationMode::Guided => {
            "Explique simplement ce qui manque ou ce qui pourrait être mieux dit."
        }
        ConversationMode::Expert => {
            "Analyse la précision, la complétude et la conformité du texte aux usages \
             de la commande publique (critères mesurables, absence de marque imposée, \
             exigences vérifiables)."
        }
    };
    format!(
        "{}\n\n{}\n\n{}\n{}",
        WRITER_ROLE,
        focus,
        context.describe(),
        reply_contract::<AnalysisReply>()
    )
}

pub fn improvement_system_prompt(mode: ConversationMode, context: &PromptContext) -> String {
    let focus = match mode {
        ConversationMode::Guided => "Réécris le texte pour qu'il soit clair et professionnel.",
        ConversationMode::Expert => {
            "Réécris le texte dans le vocabulaire de la commande publique, avec des \
             exigences vérifiables, sans en changer le sens."
        }
    };
    format!(
        "{}\n\n{}\n\n{}\n{}",
        WRITER_ROLE,
        focus,
        context.describe(),
        reply_contract::<ImprovementReply>()
    )
}

pub fn choices_system_prompt(context: &PromptContext, batch_size: usize, seen: &[&str]) -> String {
    let mut prompt = format!(
        "{}\n\nPropose au plus {} réponses courtes (quelques mots chacune), distinctes et \
         concrètes, parmi lesquelles l'utilisateur pourra choisir pour répondre à la \
         question traitée.\n\n{}",
        WRITER_ROLE,
        batch_size,
        context.describe()
    );
    if !seen.is_empty() {
        prompt.push_str("\nPROPOSITIONS DÉJÀ FAITES (ne pas les répéter)\n");
        for label in seen {
            prompt.push_str("- ");
            prompt.push_str(label);
            prompt.push('\n');
        }
    }
    prompt.push('\n');
    prompt.push_str(&reply_contract::<ChoicesReply>());
    prompt
}

pub fn synthesis_system_prompt(context: &PromptContext) -> String {
    format!(
        "{}\n\nRédige un paragraphe professionnel qui répond à la question traitée à \
         partir des éléments retenus par l'utilisateur.\n\n{}\n{}",
        WRITER_ROLE,
        context.describe(),
        reply_contract::<SynthesisReply>()
    )
}

pub fn synthesis_instruction(selected: &[&str], free_text: &str) -> String {
    let mut out = String::from("Éléments retenus :\n");
    for label in selected {
        out.push_str("- ");
        out.push_str(label);
        out.push('\n');
    }
    if !free_text.trim().is_empty() {
        out.push_str("\nPrécisions de l'utilisateur :\n");
        out.push_str(free_text.trim());
        out.push('\n');
    }
    out
}
