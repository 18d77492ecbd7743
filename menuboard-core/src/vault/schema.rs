/// menuboard-core/src/vault/schema.rs
/// The initial schema for the local state vault.
pub const MIGRATION_INIT: &str = r#"
-- Simple key-value store (survives restarts, cleared only from outside)
CREATE TABLE IF NOT EXISTS local_state (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;
