//! Database schema definition for the link-graph store.

/// Database schema definition.
pub(crate) const SCHEMA: &str = r"
-- Wikipedia pages, one row per normalized title.
-- Rows are never deleted, so rowids are stable and never reused.
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL UNIQUE,
    last_revision TEXT,
    expanded INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_pages_title ON pages(title);

-- Directed links between pages, deduplicated by the primary key.
-- rowid preserves insertion order, which is the discovery order of links.
CREATE TABLE IF NOT EXISTS links (
    source_id INTEGER NOT NULL REFERENCES pages(id),
    target_id INTEGER NOT NULL REFERENCES pages(id),
    PRIMARY KEY (source_id, target_id)
);

CREATE INDEX IF NOT EXISTS idx_links_source ON links(source_id);
";
