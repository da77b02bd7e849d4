//! Model identifiers the dossier deployment is expected to run against.

pub mod openai {
    /// Default for [`crate::openai::OpenAIClient`].
    pub const GPT_4O_ID: &str = "gpt-4o";

    /// Cheaper model used for section drafting and conversations.
    pub const GPT_4O_MINI_ID: &str = "gpt-4o-mini";
}
