/// One guided conversation per project question
pub fn migration() -> String {
    r#"
CREATE TABLE assistant_conversations (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    module_id TEXT NOT NULL,
    question_id TEXT NOT NULL,
    mode TEXT NOT NULL CHECK (mode IN ('guided', 'expert')),
    status TEXT NOT NULL CHECK (status IN ('active', 'completed')),
    messages TEXT NOT NULL DEFAULT '[]',
    generated_text TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    completed_at INTEGER,
    FOREIGN KEY (project_id) REFERENCES projects (id) ON DELETE CASCADE,
    UNIQUE (project_id, module_id, question_id)
);
"#
    .to_string()
}
