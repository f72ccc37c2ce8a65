//! SQLite schema definition.

/// Complete database schema.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Last Session (single row, overwritten on every save)
-- ============================================================================

CREATE TABLE IF NOT EXISTS last_session (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    patient_id TEXT,
    species TEXT NOT NULL CHECK (species IN ('dog', 'cat')),
    weight_kg REAL,
    dehydration_percent REAL,
    has_vomiting INTEGER NOT NULL DEFAULT 0,
    has_diarrhea INTEGER NOT NULL DEFAULT 0,
    saved_at TEXT NOT NULL
);
"#;
