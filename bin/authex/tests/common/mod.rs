use authex_core::protocol::checksum;
use authex_core::repositories::KlvRepository;
use authex_primitives::models::app_state::app_config::{AppConfig, TerminalInfo};
use authex_primitives::models::{AppState, DbPool, KlvDictionary, KlvEntry};
use axum::Router;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use secrecy::SecretString;
use std::sync::Arc;
use std::sync::Once;

pub const TEST_TERMINAL_ID: &str = "9264";
pub const TEST_TERMINAL_PASSWORD: &str = "test-terminal-password";

pub fn test_config() -> AppConfig {
    AppConfig {
        terminal: TerminalInfo {
            terminal_id: TEST_TERMINAL_ID.to_string(),
            terminal_password: SecretString::from(TEST_TERMINAL_PASSWORD),
        },
        conn_str_read: SecretString::from("postgres://invalid"),
        conn_str_write: SecretString::from("postgres://invalid"),
    }
}

pub fn test_dictionary() -> KlvDictionary {
    KlvDictionary::from_entries(vec![
        KlvEntry {
            key_index: "002".into(),
            key_name: "LastfourDigitsPAN".into(),
            key_descrp: "Last four digits of the PAN".into(),
        },
        KlvEntry {
            key_index: "042".into(),
            key_name: "TerminalCity".into(),
            key_descrp: "Terminal city".into(),
        },
    ])
}

fn unchecked_pool(url: &str) -> DbPool {
    Pool::builder()
        .max_size(2)
        .build_unchecked(ConnectionManager::<PgConnection>::new(url))
}

/// State for tests that never reach the database: the pools point nowhere
/// and fail on first checkout.
pub fn offline_state() -> Arc<AppState> {
    AppState::new(
        unchecked_pool("postgres://invalid"),
        unchecked_pool("postgres://invalid"),
        test_config(),
        test_dictionary(),
    )
}

pub fn test_app(state: Arc<AppState>) -> Router {
    authex_api::app::create_router(state)
}

static MIGRATIONS: Once = Once::new();

/// Serializes the database-backed tests: concurrent serializable
/// transactions would otherwise abort each other spuriously.
pub static DB_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

const TEST_SCHEMA: &str = r#"
DROP TABLE IF EXISTS wallet_transaction CASCADE;
DROP TABLE IF EXISTS card_issued CASCADE;
DROP TABLE IF EXISTS wallet CASCADE;
DROP TABLE IF EXISTS card_bin CASCADE;
DROP TABLE IF EXISTS wallet_group CASCADE;
DROP TABLE IF EXISTS "user" CASCADE;
DROP TABLE IF EXISTS pmtol_klvmap CASCADE;

CREATE TABLE "user" (
    user_id TEXT PRIMARY KEY,
    status_id TEXT NOT NULL
);

CREATE TABLE wallet_group (
    group_id TEXT PRIMARY KEY,
    status_id TEXT NOT NULL
);

CREATE TABLE card_bin (
    bin_number TEXT PRIMARY KEY,
    status_id TEXT NOT NULL
);

CREATE TABLE wallet (
    wallet_id TEXT PRIMARY KEY,
    status_id TEXT NOT NULL,
    currency_numeric_code TEXT NOT NULL,
    current_balance NUMERIC(18,2) NOT NULL DEFAULT 0,
    available_balance NUMERIC(18,2) NOT NULL DEFAULT 0,
    blocked_balance NUMERIC(18,2) NOT NULL DEFAULT 0,
    user_id TEXT NOT NULL REFERENCES "user"(user_id),
    group_id TEXT NOT NULL REFERENCES wallet_group(group_id)
);

CREATE TABLE card_issued (
    card_id TEXT PRIMARY KEY,
    provider_id TEXT NOT NULL,
    provider_card_id TEXT NOT NULL,
    wallet_id TEXT NOT NULL REFERENCES wallet(wallet_id),
    status_id TEXT NOT NULL,
    bin_number TEXT NOT NULL REFERENCES card_bin(bin_number),
    last_digits TEXT NOT NULL,
    expiration_date TIMESTAMPTZ NOT NULL,
    valid_date TEXT NOT NULL,
    cardholder_first_name TEXT NOT NULL,
    cardholder_last_name TEXT NOT NULL,
    other_data JSON NOT NULL DEFAULT '{}'
);

CREATE TABLE wallet_transaction (
    transaction_id UUID PRIMARY KEY,
    wallet_id TEXT NOT NULL REFERENCES wallet(wallet_id),
    group_id TEXT NOT NULL,
    transaction_type_id TEXT NOT NULL,
    transaction_operation TEXT NOT NULL,
    transaction_date TIMESTAMPTZ NOT NULL,
    transaction_amount NUMERIC(18,2) NOT NULL,
    transaction_description TEXT NOT NULL,
    transaction_data JSON NOT NULL,
    external_tx_id TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX wallet_transaction_external_idx
    ON wallet_transaction (wallet_id, external_tx_id);

CREATE TABLE pmtol_klvmap (
    key_index TEXT PRIMARY KEY,
    key_name TEXT NOT NULL,
    key_descrp TEXT NOT NULL
);

INSERT INTO pmtol_klvmap (key_index, key_name, key_descrp) VALUES
    ('002', 'LastfourDigitsPAN', 'Last four digits of the PAN'),
    ('042', 'TerminalCity', 'Terminal city');

INSERT INTO "user" (user_id, status_id) VALUES ('U-TEST', 'ACTIV');
INSERT INTO wallet_group (group_id, status_id) VALUES ('PMTOL', 'ACTIV');
INSERT INTO card_bin (bin_number, status_id) VALUES ('529999', 'ACTIV');
"#;

/// State backed by `TEST_DATABASE_URL`. Returns `None` (and the caller
/// skips) when the variable is unset or the database is unreachable.
pub fn db_state() -> Option<Arc<AppState>> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = Pool::builder()
        .max_size(5)
        .build(ConnectionManager::<PgConnection>::new(url))
        .ok()?;

    let mut conn = pool.get().ok()?;
    MIGRATIONS.call_once(|| {
        conn.batch_execute(TEST_SCHEMA)
            .expect("failed to install the test schema");
    });

    let klv = KlvRepository::load_dictionary(&mut conn).expect("failed to load the KLV dictionary");
    drop(conn);

    Some(AppState::new(pool.clone(), pool, test_config(), klv))
}

/// Renders a methodCall envelope with positional string parameters.
pub fn method_call(method: &str, params: &[String]) -> String {
    let mut body = format!("<methodCall><methodName>{}</methodName><params>", method);
    for p in params {
        body.push_str("<param><value><string>");
        body.push_str(p);
        body.push_str("</string></value></param>");
    }
    body.push_str("</params></methodCall>");
    body
}

/// Appends a valid checksum slot to the given parameters.
pub fn sign(method: &str, params: &[&str]) -> Vec<String> {
    let mut canonical = String::from(method);
    for p in params {
        canonical.push_str(p);
    }
    let cs = checksum::compute(TEST_TERMINAL_PASSWORD.as_bytes(), &canonical)
        .expect("checksum computation failed");

    let mut out: Vec<String> = params.iter().map(|p| p.to_string()).collect();
    out.push(cs);
    out
}
