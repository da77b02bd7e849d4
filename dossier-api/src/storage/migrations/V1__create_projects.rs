/// Project records with their wizard state and sections stored as JSON
pub fn migration() -> String {
    r#"
CREATE TABLE projects (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    title TEXT NOT NULL,
    need_type TEXT,
    department TEXT,
    urgency TEXT,
    context TEXT,
    objectives TEXT,
    constraints TEXT,
    wizard_state TEXT,
    sections TEXT NOT NULL DEFAULT '[]',
    version INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX idx_projects_owner
    ON projects(owner_id);
"#
    .to_string()
}
