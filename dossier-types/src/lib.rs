pub mod answer;
pub mod assistant;
pub mod choices;
pub mod module;
pub mod progress;
pub mod project;
pub mod question;
pub mod wizard;

pub use answer::{Answer, AnswerValue, FlatAnswer, Selection, ELABORATION_MARKER};
pub use assistant::{
    AssistantConversation, AssistantMessage, ConversationKey, ConversationMode,
    ConversationStatus, MessageRole, MessageType, Suggestion,
};
pub use choices::{ChoiceSession, ChoiceSource, GuidedChoice};
pub use module::ModuleDefinition;
pub use progress::{ModuleProgress, OverallProgress};
pub use project::{LegacyField, Project};
pub use question::{
    ChoiceOption, Condition, ConditionOperator, ConditionalBlock, Question, QuestionKind,
};
pub use wizard::{ModuleState, ModuleStatus, Section, WizardState};

#[cfg(test)]
mod tests;
