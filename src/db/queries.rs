pub const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
  id           TEXT PRIMARY KEY,
  display_name TEXT NOT NULL DEFAULT ''
);
"#;

pub const CREATE_ENTRIES: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
  id          INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id     TEXT NOT NULL REFERENCES users(id),
  occurred_on TEXT NOT NULL,
  mood        TEXT NOT NULL DEFAULT '',
  title       TEXT NOT NULL DEFAULT '',
  body        TEXT NOT NULL DEFAULT ''
);
"#;

pub const CREATE_ENTRY_TAGS: &str = r#"
CREATE TABLE IF NOT EXISTS entry_tags (
  entry_id INTEGER NOT NULL REFERENCES entries(id) ON DELETE CASCADE,
  tag_name TEXT NOT NULL,
  UNIQUE (entry_id, tag_name)
);
"#;

pub const CREATE_TRANSACTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
  id          INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id     TEXT NOT NULL REFERENCES users(id),
  occurred_on TEXT NOT NULL,
  kind        TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
  amount      REAL NOT NULL DEFAULT 0
);
"#;

pub const CREATE_HABITS: &str = r#"
CREATE TABLE IF NOT EXISTS habits (
  id        INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id   TEXT NOT NULL REFERENCES users(id),
  name      TEXT NOT NULL,
  is_active INTEGER NOT NULL DEFAULT 1
);
"#;

pub const CREATE_HABIT_LOGS: &str = r#"
CREATE TABLE IF NOT EXISTS habit_logs (
  habit_id     INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
  log_date     TEXT NOT NULL,
  is_completed INTEGER NOT NULL DEFAULT 0,
  UNIQUE (habit_id, log_date)
);
"#;

pub const INDEX_ENTRIES_USER_DATE: &str =
    "CREATE INDEX IF NOT EXISTS idx_entries_user_date ON entries(user_id, occurred_on);";

pub const INDEX_TRANSACTIONS_USER: &str =
    "CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id);";

pub const INDEX_HABITS_USER: &str =
    "CREATE INDEX IF NOT EXISTS idx_habits_user ON habits(user_id);";

pub fn schema_statements() -> Vec<&'static str> {
    vec![
        CREATE_USERS,
        CREATE_ENTRIES,
        CREATE_ENTRY_TAGS,
        CREATE_TRANSACTIONS,
        CREATE_HABITS,
        CREATE_HABIT_LOGS,
        INDEX_ENTRIES_USER_DATE,
        INDEX_TRANSACTIONS_USER,
        INDEX_HABITS_USER,
    ]
}
