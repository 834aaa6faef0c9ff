pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS movements (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    owner        INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    occurred_on  TEXT NOT NULL,
    category     TEXT NOT NULL,
    description  TEXT NOT NULL,
    kind         TEXT NOT NULL,
    amount       TEXT NOT NULL,
    is_recurring BOOLEAN NOT NULL DEFAULT 0,
    is_settled   BOOLEAN NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_movements_owner ON movements(owner);
CREATE INDEX IF NOT EXISTS idx_movements_owner_date ON movements(owner, occurred_on);

CREATE TABLE IF NOT EXISTS budgets (
    owner        INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    category     TEXT NOT NULL,
    limit_amount TEXT NOT NULL,
    PRIMARY KEY (owner, category)
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;
