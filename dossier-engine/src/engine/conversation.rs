use super::{question_label, DossierEngine};
use crate::error::EngineError;
use crate::prompts::{
    analysis_system_prompt, conversation_system_prompt, improvement_system_prompt,
    opening_system_prompt, suggestions_system_prompt, AnalysisReply, ImprovementReply,
    OpeningReply, PromptContext, SuggestionsReply, TurnReply, OPENING_INSTRUCTION,
};
use chrono::Utc;
use dossier_llm_sdk::types::Message;
use dossier_types::{
    AssistantConversation, AssistantMessage, ConversationKey, ConversationMode,
    ConversationStatus, MessageRole, MessageType, Project, Section, Suggestion,
};
use serde::Serialize;

/// Result of stopping a conversation early.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSummary {
    pub generated_text: String,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    pub analysis: String,
    pub suggestions: Vec<String>,
}

/// Appends a suggestion preview with a single separating space.
pub fn append_suggestion(current: &str, preview: &str) -> String {
    format!("{} {}", current.trim_end(), preview.trim_start())
        .trim()
        .to_string()
}

const COMPLETE_MESSAGE: &str = "Merci, le texte est complet pour cette question.";
const FOLLOW_UP_MESSAGE: &str = "Souhaitez-vous préciser ou compléter votre réponse ?";

fn history(conversation: &AssistantConversation) -> Vec<Message> {
    conversation
        .messages
        .iter()
        .map(|m| match m.role {
            MessageRole::User => Message::user(m.content.as_str()),
            MessageRole::Assistant => Message::assistant(m.content.as_str()),
        })
        .collect()
}

impl DossierEngine {
    async fn load_conversation(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
        question_id: &str,
    ) -> Result<(Project, AssistantConversation), EngineError> {
        let project = self.load_owned(project_id, caller_id).await?;
        let key = ConversationKey::new(project_id, module_id, question_id);
        let conversation = self
            .store
            .get_conversation(&key)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("Conversation {} not found", key)))?;
        Ok((project, conversation))
    }

    fn conversation_context(
        &self,
        project: &Project,
        module_id: &str,
        question_id: &str,
    ) -> Result<PromptContext, EngineError> {
        let module = self.module(module_id)?;
        let label = question_label(module, question_id)?;
        Ok(PromptContext::new(project, module, &label))
    }

    /// Starts a fresh conversation, replacing any previous one for the
    /// same question once the opening question has been generated.
    pub async fn init_conversation(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
        question_id: &str,
        mode: ConversationMode,
    ) -> Result<AssistantConversation, EngineError> {
        self.generator.require()?;
        let project = self.load_owned(project_id, caller_id).await?;
        let context = self.conversation_context(&project, module_id, question_id)?;

        let reply: OpeningReply = self
            .generator
            .complete_json(
                &opening_system_prompt(mode, &context),
                vec![Message::user(OPENING_INSTRUCTION)],
            )
            .await?;

        let mut opening = AssistantMessage::assistant(reply.question, MessageType::Question);
        opening.options = reply.options;
        opening.example = reply.example;

        let now = Utc::now();
        let conversation = AssistantConversation {
            id: uuid::Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            module_id: module_id.to_string(),
            question_id: question_id.to_string(),
            mode,
            status: ConversationStatus::Active,
            messages: vec![opening],
            generated_text: String::new(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        };

        // Keyed upsert: a previous conversation for this question is replaced
        // in the same write.
        self.store.save_conversation(&conversation).await?;

        tracing::info!(
            project_id = %project_id,
            module_id = %module_id,
            question_id = %question_id,
            conversation_id = %conversation.id,
            mode = ?mode,
            "Conversation started"
        );
        Ok(conversation)
    }

    pub async fn get_conversation(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
        question_id: &str,
    ) -> Result<AssistantConversation, EngineError> {
        let (_, conversation) = self
            .load_conversation(project_id, caller_id, module_id, question_id)
            .await?;
        Ok(conversation)
    }

    /// Integrates one user answer. Nothing is stored unless the reply parses.
    pub async fn process_response(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
        question_id: &str,
        text: &str,
    ) -> Result<AssistantConversation, EngineError> {
        self.generator.require()?;
        if text.trim().is_empty() {
            return Err(EngineError::BadRequest("Response cannot be empty".to_string()));
        }

        let (project, mut conversation) = self
            .load_conversation(project_id, caller_id, module_id, question_id)
            .await?;
        if conversation.status == ConversationStatus::Completed {
            return Err(EngineError::BadRequest(format!(
                "Conversation {} is already completed",
                conversation.id
            )));
        }

        let context = self.conversation_context(&project, module_id, question_id)?;
        let system = conversation_system_prompt(
            conversation.mode,
            &context,
            &conversation.generated_text,
        );
        let mut messages = history(&conversation);
        messages.push(Message::user(text));

        let reply: TurnReply = self.generator.complete_json(&system, messages).await?;

        let now = Utc::now();
        conversation.messages.push(AssistantMessage::user(text));

        let message_type = if reply.is_complete {
            MessageType::Final
        } else {
            MessageType::Validation
        };
        let fallback = if reply.is_complete {
            COMPLETE_MESSAGE
        } else {
            FOLLOW_UP_MESSAGE
        };
        let content = reply
            .next_question
            .filter(|q| !q.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        let mut answer = AssistantMessage::assistant(content, message_type);
        answer.options = reply.options;
        answer.example = reply.example;
        answer.generated_text = Some(reply.integrated_text.clone());
        conversation.messages.push(answer);

        conversation.generated_text = reply.integrated_text;
        conversation.updated_at = now;
        if reply.is_complete {
            conversation.status = ConversationStatus::Completed;
            conversation.completed_at = Some(now);
        }
        self.store.save_conversation(&conversation).await?;

        tracing::info!(
            conversation_id = %conversation.id,
            question_id = %question_id,
            complete = reply.is_complete,
            turns = conversation.messages.len(),
            "Conversation response processed"
        );
        Ok(conversation)
    }

    /// Early stop: returns the current text with enrichment suggestions.
    /// The conversation itself is left unchanged.
    pub async fn complete_conversation(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
        question_id: &str,
    ) -> Result<CompletionSummary, EngineError> {
        self.generator.require()?;
        let (project, conversation) = self
            .load_conversation(project_id, caller_id, module_id, question_id)
            .await?;

        let generated_text = conversation.generated_text;
        if generated_text.trim().is_empty() {
            return Ok(CompletionSummary {
                generated_text,
                suggestions: Vec::new(),
            });
        }

        let context = self.conversation_context(&project, module_id, question_id)?;
        let suggestions = match self
            .generator
            .complete_json::<SuggestionsReply>(
                &suggestions_system_prompt(&context),
                vec![Message::user(generated_text.as_str())],
            )
            .await
        {
            Ok(reply) => reply
                .suggestions
                .into_iter()
                .filter(|s| !s.preview_text.trim().is_empty())
                .map(|s| Suggestion {
                    id: s
                        .id
                        .filter(|id| !id.trim().is_empty())
                        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                    title: s.title,
                    preview_text: s.preview_text,
                })
                .collect(),
            Err(e) => {
                tracing::warn!(
                    conversation_id = %conversation.id,
                    error = %e,
                    "Failed to fetch enrichment suggestions"
                );
                Vec::new()
            }
        };

        Ok(CompletionSummary {
            generated_text,
            suggestions,
        })
    }

    pub async fn apply_suggestion(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
        question_id: &str,
        suggestion_id: &str,
        preview_text: &str,
    ) -> Result<AssistantConversation, EngineError> {
        let (_, mut conversation) = self
            .load_conversation(project_id, caller_id, module_id, question_id)
            .await?;

        conversation.generated_text = append_suggestion(&conversation.generated_text, preview_text);
        conversation.updated_at = Utc::now();
        self.store.save_conversation(&conversation).await?;

        tracing::info!(
            conversation_id = %conversation.id,
            suggestion_id = %suggestion_id,
            "Suggestion applied"
        );
        Ok(conversation)
    }

    /// Moves the generated text into the module section and closes the
    /// conversation.
    pub async fn save_to_section(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
        question_id: &str,
    ) -> Result<Section, EngineError> {
        let (mut project, mut conversation) = self
            .load_conversation(project_id, caller_id, module_id, question_id)
            .await?;
        if conversation.generated_text.trim().is_empty() {
            return Err(EngineError::BadRequest(
                "Nothing has been generated yet".to_string(),
            ));
        }

        let module = self.module(module_id)?;
        let previous = conversation.clone();
        let now = Utc::now();
        conversation.status = ConversationStatus::Completed;
        conversation.completed_at = Some(now);
        conversation.updated_at = now;
        self.store.save_conversation(&conversation).await?;

        // The conversation is closed first; if the section write fails it is
        // put back so the call leaves no change behind.
        let section = match self
            .save_generated_text(&mut project, module, conversation.generated_text.trim())
            .await
        {
            Ok(section) => section,
            Err(err) => {
                if let Err(restore_err) = self.store.save_conversation(&previous).await {
                    tracing::error!(
                        conversation_id = %previous.id,
                        error = %restore_err,
                        "Failed to reopen conversation after section write failed"
                    );
                }
                return Err(err);
            }
        };

        tracing::info!(conversation_id = %conversation.id, "Conversation saved to section");
        Ok(section)
    }

    pub async fn switch_mode(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
        question_id: &str,
        mode: ConversationMode,
    ) -> Result<AssistantConversation, EngineError> {
        let (_, mut conversation) = self
            .load_conversation(project_id, caller_id, module_id, question_id)
            .await?;
        if conversation.mode != mode {
            conversation.mode = mode;
            conversation.updated_at = Utc::now();
            self.store.save_conversation(&conversation).await?;
            tracing::info!(conversation_id = %conversation.id, mode = ?mode, "Conversation mode switched");
        }
        Ok(conversation)
    }

    pub async fn analyze_text(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
        question_id: &str,
        text: &str,
    ) -> Result<TextAnalysis, EngineError> {
        self.generator.require()?;
        if text.trim().is_empty() {
            return Err(EngineError::BadRequest("Text cannot be empty".to_string()));
        }
        let (project, conversation) = self
            .load_conversation(project_id, caller_id, module_id, question_id)
            .await?;
        let context = self.conversation_context(&project, module_id, question_id)?;

        let reply: AnalysisReply = self
            .generator
            .complete_json(
                &analysis_system_prompt(conversation.mode, &context),
                vec![Message::user(text)],
            )
            .await?;

        Ok(TextAnalysis {
            analysis: reply.analysis,
            suggestions: reply.suggestions,
        })
    }

    pub async fn generate_suggestion(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
        question_id: &str,
        text: &str,
    ) -> Result<String, EngineError> {
        self.generator.require()?;
        if text.trim().is_empty() {
            return Err(EngineError::BadRequest("Text cannot be empty".to_string()));
        }
        let (project, conversation) = self
            .load_conversation(project_id, caller_id, module_id, question_id)
            .await?;
        let context = self.conversation_context(&project, module_id, question_id)?;

        let reply: ImprovementReply = self
            .generator
            .complete_json(
                &improvement_system_prompt(conversation.mode, &context),
                vec![Message::user(text)],
            )
            .await?;
        Ok(reply.suggestion)
    }
}
