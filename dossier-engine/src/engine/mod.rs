//! Operations exposed to the application layer.
//!
//! Every operation loads the project, checks that the caller owns it and
//! writes the whole record back with a version check. Generation steps check
//! that a completion client is configured before touching any state.

use crate::answers;
use crate::catalog::ModuleCatalog;
use crate::conditions::effective_questions;
use crate::config::EngineSettings;
use crate::error::EngineError;
use crate::llm::Generator;
use crate::navigator;
use crate::progress::{module_progress, overall_progress};
use crate::storage::ProjectStore;
use crate::template;
use chrono::{DateTime, Utc};
use dossier_llm_sdk::types::Message;
use dossier_types::{
    Answer, AnswerValue, FlatAnswer, LegacyField, ModuleDefinition, ModuleProgress,
    ModuleStatus, OverallProgress, Project, Question, Section, WizardState,
};
use std::collections::BTreeMap;
use std::sync::Arc;

mod choices;
mod conversation;


pub use conversation::{append_suggestion, CompletionSummary, TextAnalysis};

/// Sizing of the guided-choices flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceSettings {
    pub batch_size: usize,
    pub max_generations: u32,
}

impl Default for ChoiceSettings {
    fn default() -> Self {
        Self {
            batch_size: 8,
            max_generations: 3,
        }
    }
}

impl From<&EngineSettings> for ChoiceSettings {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            batch_size: settings.choice_batch_size,
            max_generations: settings.max_choice_generations,
        }
    }
}

#[derive(Clone)]
pub struct DossierEngine {
    store: Arc<dyn ProjectStore>,
    catalog: Arc<ModuleCatalog>,
    generator: Generator,
    choices: ChoiceSettings,
}

impl DossierEngine {
    pub fn new(store: Arc<dyn ProjectStore>, catalog: Arc<ModuleCatalog>, generator: Generator) -> Self {
        Self {
            store,
            catalog,
            generator,
            choices: ChoiceSettings::default(),
        }
    }

    pub fn with_choice_settings(mut self, choices: ChoiceSettings) -> Self {
        self.choices = choices;
        self
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    async fn load_owned(&self, project_id: &str, caller_id: &str) -> Result<Project, EngineError> {
        let project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("Project {} not found", project_id)))?;

        if project.owner_id != caller_id {
            tracing::warn!(project_id = %project_id, caller_id = %caller_id, "Access denied to project");
            return Err(EngineError::Forbidden(format!(
                "Project {} belongs to another user",
                project_id
            )));
        }
        Ok(project)
    }

    async fn persist(&self, project: &mut Project) -> Result<(), EngineError> {
        let version = self.store.update_project(project).await?;
        project.version = version;
        Ok(())
    }

    fn module(&self, module_id: &str) -> Result<&ModuleDefinition, EngineError> {
        self.catalog
            .get(module_id)
            .ok_or_else(|| EngineError::NotFound(format!("Module {} not found", module_id)))
    }

    /// Writes prose into a module section and its legacy column, if any.
    fn store_section_content(
        project: &mut Project,
        module: &ModuleDefinition,
        content: &str,
        now: DateTime<Utc>,
    ) {
        answers::section_entry(project, module).content = content.to_string();
        if let Some(field) = LegacyField::for_module(&module.id) {
            project.set_legacy_field(field, content.to_string());
        }
        if let Some(state) = project.wizard_state.as_mut() {
            state.last_activity_at = now;
        }
        project.updated_at = now;
    }

    /// Save path shared by conversations and guided choices.
    async fn save_generated_text(
        &self,
        project: &mut Project,
        module: &ModuleDefinition,
        text: &str,
    ) -> Result<Section, EngineError> {
        let now = Utc::now();
        navigator::initialize(project, self.catalog.modules(), now);
        Self::store_section_content(project, module, text, now);
        self.persist(project).await?;

        tracing::info!(
            project_id = %project.id,
            module_id = %module.id,
            chars = text.len(),
            "Generated text saved to section"
        );
        Ok(answers::section_entry(project, module).clone())
    }

    pub async fn create_project(&self, project: Project) -> Result<Project, EngineError> {
        if project.title.trim().is_empty() {
            return Err(EngineError::BadRequest("Project title cannot be empty".to_string()));
        }
        let project = self.store.create_project(project).await?;
        tracing::info!(project_id = %project.id, owner_id = %project.owner_id, "Project created");
        Ok(project)
    }

    pub async fn get_project(&self, project_id: &str, caller_id: &str) -> Result<Project, EngineError> {
        self.load_owned(project_id, caller_id).await
    }

    pub async fn init_wizard(&self, project_id: &str, caller_id: &str) -> Result<WizardState, EngineError> {
        let mut project = self.load_owned(project_id, caller_id).await?;
        let now = Utc::now();

        if navigator::initialize(&mut project, self.catalog.modules(), now) {
            self.persist(&mut project).await?;
            tracing::info!(project_id = %project_id, "Wizard initialized");
        }
        Ok(project
            .wizard_state
            .unwrap_or_else(|| WizardState::new(now)))
    }

    pub async fn get_wizard_state(
        &self,
        project_id: &str,
        caller_id: &str,
    ) -> Result<Option<WizardState>, EngineError> {
        Ok(self.load_owned(project_id, caller_id).await?.wizard_state)
    }

    pub async fn get_effective_questions(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
    ) -> Result<Vec<Question>, EngineError> {
        let project = self.load_owned(project_id, caller_id).await?;
        let module = self.module(module_id)?;
        let answer_map = answers::answer_map(&project);
        Ok(effective_questions(module, &answer_map)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn save_answer(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
        question_id: &str,
        question_label: &str,
        value: AnswerValue,
    ) -> Result<ModuleProgress, EngineError> {
        let mut project = self.load_owned(project_id, caller_id).await?;
        let module = self.module(module_id)?;
        let now = Utc::now();

        navigator::initialize(&mut project, self.catalog.modules(), now);
        answers::save_answer(&mut project, module, question_id, question_label, value, now);
        self.persist(&mut project).await?;

        tracing::info!(
            project_id = %project_id,
            module_id = %module_id,
            question_id = %question_id,
            "Answer saved"
        );
        Ok(module_progress(
            &project,
            module,
            &answers::answer_map(&project),
        ))
    }

    pub async fn get_answers(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
    ) -> Result<Vec<Answer>, EngineError> {
        let project = self.load_owned(project_id, caller_id).await?;
        self.module(module_id)?;
        Ok(answers::module_answers(&project, module_id).to_vec())
    }

    pub async fn get_all_answers_flat(
        &self,
        project_id: &str,
        caller_id: &str,
    ) -> Result<BTreeMap<String, FlatAnswer>, EngineError> {
        let project = self.load_owned(project_id, caller_id).await?;
        Ok(answers::flat_answers(&project))
    }

    pub async fn get_module_progress(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
    ) -> Result<ModuleProgress, EngineError> {
        let project = self.load_owned(project_id, caller_id).await?;
        let module = self.module(module_id)?;
        Ok(module_progress(
            &project,
            module,
            &answers::answer_map(&project),
        ))
    }

    pub async fn get_overall_progress(
        &self,
        project_id: &str,
        caller_id: &str,
    ) -> Result<OverallProgress, EngineError> {
        let project = self.load_owned(project_id, caller_id).await?;
        Ok(overall_progress(
            &project,
            self.catalog.modules(),
            &answers::answer_map(&project),
        ))
    }

    pub async fn navigate(
        &self,
        project_id: &str,
        caller_id: &str,
        module_index: usize,
        question_index: Option<usize>,
    ) -> Result<WizardState, EngineError> {
        let mut project = self.load_owned(project_id, caller_id).await?;
        let now = Utc::now();

        navigator::initialize(&mut project, self.catalog.modules(), now);
        let state = project
            .wizard_state
            .get_or_insert_with(|| WizardState::new(now));
        navigator::navigate(state, module_index, question_index, now);
        let state = state.clone();
        project.updated_at = now;
        self.persist(&mut project).await?;

        tracing::debug!(
            project_id = %project_id,
            module_index = module_index,
            question_index = state.current_question,
            "Wizard pointer moved"
        );
        Ok(state)
    }

    pub async fn assemble_prompt(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
    ) -> Result<String, EngineError> {
        let project = self.load_owned(project_id, caller_id).await?;
        let module = self.module(module_id)?;
        let template = module.prompt_template.as_deref().ok_or_else(|| {
            EngineError::BadRequest(format!("Module {} has no prompt template", module_id))
        })?;

        Ok(template::assemble_prompt(
            template,
            answers::module_answers(&project, module_id),
            &project,
        ))
    }

    /// One-shot generation of a module's candidate content. The text is
    /// returned as is and only the section's generation counter is stored.
    pub async fn generate_module_content(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
    ) -> Result<String, EngineError> {
        self.generator.require()?;
        let prompt = self.assemble_prompt(project_id, caller_id, module_id).await?;
        tracing::debug!(module_id = %module_id, prompt = %prompt, "Module prompt assembled");

        let content = self
            .generator
            .complete_text(None, vec![Message::user(prompt)])
            .await?;

        let mut project = self.load_owned(project_id, caller_id).await?;
        let module = self.module(module_id)?;
        answers::section_entry(&mut project, module).generation_count += 1;
        project.updated_at = Utc::now();
        self.persist(&mut project).await?;

        tracing::info!(
            project_id = %project_id,
            module_id = %module_id,
            chars = content.len(),
            "Module content generated"
        );
        Ok(content)
    }

    pub async fn validate_module(
        &self,
        project_id: &str,
        caller_id: &str,
        module_id: &str,
        content: &str,
    ) -> Result<Section, EngineError> {
        if content.trim().is_empty() {
            return Err(EngineError::BadRequest("Module content cannot be empty".to_string()));
        }

        let mut project = self.load_owned(project_id, caller_id).await?;
        let module = self.module(module_id)?;
        let now = Utc::now();

        navigator::initialize(&mut project, self.catalog.modules(), now);
        Self::store_section_content(&mut project, module, content, now);
        answers::section_entry(&mut project, module).validated_at = Some(now);

        let state = project
            .wizard_state
            .get_or_insert_with(|| WizardState::new(now))
            .module_mut(module_id);
        state.status = ModuleStatus::Completed;
        state.started_at.get_or_insert(now);
        state.completed_at = Some(now);
        state.validated_at = Some(now);

        self.persist(&mut project).await?;
        tracing::info!(project_id = %project_id, module_id = %module_id, "Module validated");

        Ok(answers::section_entry(&mut project, module).clone())
    }
}

/// Label of a question of `module`, conditional ones included.
fn question_label(module: &ModuleDefinition, question_id: &str) -> Result<String, EngineError> {
    module
        .questions
        .iter()
        .chain(module.conditional_blocks.iter().flat_map(|b| b.questions.iter()))
        .find(|q| q.id == question_id)
        .map(|q| q.label.clone())
        .ok_or_else(|| {
            EngineError::NotFound(format!(
                "Question {} not found in module {}",
                question_id, module.id
            ))
        })
}
