//! SQLite schema definition.

/// Complete database schema for medscan.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Medication Catalog
-- ============================================================================

-- seq preserves insertion order, which is the corpus tie-break order
CREATE TABLE IF NOT EXISTS medications (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    name_localized TEXT,
    generic_name TEXT,
    generic_name_localized TEXT,
    category TEXT,
    category_localized TEXT,
    primary_use TEXT,
    primary_use_localized TEXT,
    dosage TEXT,
    dosage_localized TEXT,
    warnings TEXT,
    warnings_localized TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Search History (Append-Only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS search_history (
    entry_id TEXT PRIMARY KEY,
    query_text TEXT NOT NULL,
    method TEXT NOT NULL CHECK (method IN ('photo', 'manual')),
    matched_record_id TEXT,                      -- NULL when nothing matched
    searched_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_history_searched_at ON search_history(searched_at);
"#;
