pub mod answers;
pub mod catalog;
pub mod conditions;
pub mod config;
pub mod engine;
pub mod error;
pub mod llm;
pub mod navigator;
pub mod progress;
pub mod prompts;
pub mod storage;
pub mod template;

pub use catalog::ModuleCatalog;
pub use engine::{ChoiceSettings, CompletionSummary, DossierEngine};
pub use error::EngineError;
pub use llm::{GenerationConfig, Generator};
pub use storage::{InMemoryProjectStore, ProjectStore, StorageError};
