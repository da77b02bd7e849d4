use super::DossierEngine;
use crate::error::EngineError;
use crate::prompts::{
    choices_system_prompt, synthesis_instruction, synthesis_system_prompt, ChoicesReply,
    PromptContext, SynthesisReply,
};
use dossier_llm_sdk::types::Message;
use dossier_types::{ChoiceSession, ChoiceSource, GuidedChoice, Section};

/// Keeps the labels that are neither blank nor already offered, in order.
fn fresh_choices(session: &ChoiceSession, labels: Vec<String>, limit: usize) -> Vec<GuidedChoice> {
    let mut fresh: Vec<GuidedChoice> = Vec::new();
    for label in labels {
        let label = label.trim();
        if label.is_empty() || session.contains_label(label) {
            continue;
        }
        let lowered = label.to_lowercase();
        if fresh.iter().any(|c| c.label.to_lowercase() == lowered) {
            continue;
        }
        fresh.push(GuidedChoice::new(label, ChoiceSource::Ai));
        if fresh.len() == limit {
            break;
        }
    }
    fresh
}

impl DossierEngine {
    async fn choices_context(
        &self,
        caller_id: &str,
        session: &ChoiceSession,
    ) -> Result<PromptContext, EngineError> {
        let project = self.load_owned(&session.project_id, caller_id).await?;
        let module = self.module(&session.module_id)?;
        Ok(PromptContext::new(&project, module, &session.question_label))
    }

    async fn request_choices(
        &self,
        caller_id: &str,
        session: &ChoiceSession,
        seen: &[&str],
    ) -> Result<Vec<String>, EngineError> {
        let context = self.choices_context(caller_id, session).await?;
        let reply: ChoicesReply = self
            .generator
            .complete_json(
                &choices_system_prompt(&context, self.choices.batch_size, seen),
                vec![Message::user(session.question_label.as_str())],
            )
            .await?;
        Ok(reply.choices)
    }

    pub async fn start_choices(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
        question_id: &str,
        question_label: &str,
    ) -> Result<ChoiceSession, EngineError> {
        self.load_owned(project_id, caller_id).await?;
        self.module(module_id)?;

        let label = if question_label.trim().is_empty() {
            super::question_label(self.module(module_id)?, question_id)?
        } else {
            question_label.trim().to_string()
        };

        let session = ChoiceSession::new(
            project_id,
            module_id,
            question_id,
            label.as_str(),
            self.choices.max_generations,
        );
        tracing::info!(
            session_id = %session.id,
            project_id = %project_id,
            module_id = %module_id,
            question_id = %question_id,
            "Choice session started"
        );
        Ok(session)
    }

    /// First batch. Unselected AI proposals from an earlier batch are
    /// replaced, selections and user entries are kept.
    pub async fn generate_choices(
        &self,
        caller_id: &str,
        session: &mut ChoiceSession,
    ) -> Result<Vec<GuidedChoice>, EngineError> {
        self.generator.require()?;
        let labels = self.request_choices(caller_id, session, &[]).await?;

        session
            .choices
            .retain(|c| c.selected || c.source == ChoiceSource::User);
        let fresh = fresh_choices(session, labels, self.choices.batch_size);
        session.choices.extend(fresh.iter().cloned());
        session.generations = 1;

        tracing::info!(session_id = %session.id, count = fresh.len(), "Choices generated");
        Ok(fresh)
    }

    pub async fn generate_more_choices(
        &self,
        caller_id: &str,
        session: &mut ChoiceSession,
    ) -> Result<Vec<GuidedChoice>, EngineError> {
        self.generator.require()?;
        if !session.can_generate_more() {
            return Err(EngineError::BadRequest(format!(
                "No more generations left ({} of {} used)",
                session.generations, session.max_generations
            )));
        }

        let labels = {
            let seen: Vec<&str> = session.choices.iter().map(|c| c.label.as_str()).collect();
            self.request_choices(caller_id, session, &seen).await?
        };

        let fresh = fresh_choices(session, labels, self.choices.batch_size);
        session.choices.extend(fresh.iter().cloned());
        session.generations += 1;

        tracing::info!(
            session_id = %session.id,
            count = fresh.len(),
            generations = session.generations,
            "More choices generated"
        );
        Ok(fresh)
    }

    pub fn toggle_choice(
        &self,
        session: &mut ChoiceSession,
        choice_id: &str,
    ) -> Result<GuidedChoice, EngineError> {
        let choice = session
            .choices
            .iter_mut()
            .find(|c| c.id == choice_id)
            .ok_or_else(|| EngineError::NotFound(format!("Choice {} not found", choice_id)))?;
        choice.selected = !choice.selected;
        Ok(choice.clone())
    }

    /// Adds a user entry, selected. An entry matching an existing label
    /// selects that choice instead.
    pub fn add_free_input_as_choice(
        &self,
        session: &mut ChoiceSession,
        text: &str,
    ) -> Result<GuidedChoice, EngineError> {
        let label = text.trim();
        if label.is_empty() {
            return Err(EngineError::BadRequest("Choice text cannot be empty".to_string()));
        }

        let lowered = label.to_lowercase();
        if let Some(existing) = session
            .choices
            .iter_mut()
            .find(|c| c.label.trim().to_lowercase() == lowered)
        {
            existing.selected = true;
            return Ok(existing.clone());
        }

        let mut choice = GuidedChoice::new(label, ChoiceSource::User);
        choice.selected = true;
        session.choices.push(choice.clone());
        Ok(choice)
    }

    pub fn set_free_text(&self, session: &mut ChoiceSession, text: &str) {
        session.free_text = text.to_string();
    }

    /// Synthesizes the selections into prose and saves it to the module
    /// section. The caller discards the session on success.
    pub async fn generate_answer_from_choices(
        &self,
        caller_id: &str,
        session: &ChoiceSession,
    ) -> Result<Section, EngineError> {
        let selected = session.selected_labels();
        if selected.is_empty() && session.free_text.trim().is_empty() {
            return Err(EngineError::BadRequest(
                "Select at least one choice or add a free text".to_string(),
            ));
        }
        self.generator.require()?;

        let mut project = self.load_owned(&session.project_id, caller_id).await?;
        let module = self.module(&session.module_id)?;
        let context = PromptContext::new(&project, module, &session.question_label);

        let reply: SynthesisReply = self
            .generator
            .complete_json(
                &synthesis_system_prompt(&context),
                vec![Message::user(synthesis_instruction(&selected, &session.free_text))],
            )
            .await?;
        let text = reply.text.trim();
        if text.is_empty() {
            return Err(EngineError::InternalFailure(
                "Text generation returned an empty synthesis".to_string(),
            ));
        }

        let section = self.save_generated_text(&mut project, module, text).await?;
        tracing::info!(
            session_id = %session.id,
            selected = selected.len(),
            "Answer synthesized from choices"
        );
        Ok(section)
    }
}
