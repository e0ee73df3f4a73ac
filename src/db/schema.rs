pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS settings (
    id                      INTEGER PRIMARY KEY CHECK (id = 1),
    occupancy_rate          TEXT NOT NULL,
    working_days_per_month  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS fixed_costs (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name    TEXT NOT NULL,
    amount  TEXT NOT NULL,
    month   TEXT
);

CREATE INDEX IF NOT EXISTS idx_fixed_costs_month ON fixed_costs(month);

CREATE TABLE IF NOT EXISTS catalog_items (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    name                TEXT NOT NULL,
    default_unit_cost   TEXT NOT NULL,
    default_unit_price  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS quotes (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    client_name       TEXT NOT NULL,
    client_phone      TEXT NOT NULL DEFAULT '',
    event_name        TEXT NOT NULL,
    event_date        TEXT,
    guest_count       INTEGER NOT NULL DEFAULT 0,
    status            TEXT NOT NULL DEFAULT 'Draft',
    pricing_mode      TEXT NOT NULL DEFAULT 'fixed-price',
    desired_margin    TEXT,
    fixed_cost_share  TEXT NOT NULL DEFAULT '0',
    variable_cost     TEXT NOT NULL DEFAULT '0',
    total_sales       TEXT NOT NULL DEFAULT '0',
    net_profit        TEXT NOT NULL DEFAULT '0',
    margin_percent    TEXT NOT NULL DEFAULT '0',
    created_at        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_quotes_event_date ON quotes(event_date);
CREATE INDEX IF NOT EXISTS idx_quotes_status ON quotes(status);

CREATE TABLE IF NOT EXISTS quote_items (
    quote_id    INTEGER NOT NULL REFERENCES quotes(id) ON DELETE CASCADE,
    item_key    TEXT NOT NULL,
    position    INTEGER NOT NULL,
    name        TEXT NOT NULL,
    quantity    INTEGER NOT NULL,
    unit_cost   TEXT NOT NULL,
    unit_price  TEXT,
    PRIMARY KEY (quote_id, item_key)
);

"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
