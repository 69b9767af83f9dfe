use crate::codes::SERVICE_NAME;
use eyre::{eyre, Report};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use tracing::info;

/// Connection pool size for both the read and the write pool.
pub const DB_POOL_MAX_CONNS: u32 = 50;

/// Terminal credentials shared with the processor. The password is the HMAC
/// key for request checksums.
#[derive(Clone)]
pub struct TerminalInfo {
    pub terminal_id: String,
    pub terminal_password: SecretString,
}

impl TerminalInfo {
    pub fn password_bytes(&self) -> &[u8] {
        self.terminal_password.expose_secret().as_bytes()
    }
}

/// Source of the secret entry named by `SECRET_ID`. Secret retrieval is an
/// external collaborator; the default store resolves the entry from the
/// process environment.
pub trait SecretStore {
    fn fetch(&self, region: &str, secret_id: &str) -> Result<HashMap<String, String>, Report>;
}

pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn fetch(&self, _region: &str, secret_id: &str) -> Result<HashMap<String, String>, Report> {
        let raw = env::var(secret_id)
            .map_err(|_| eyre!("secret entry {} is not available", secret_id))?;
        serde_json::from_str(&raw)
            .map_err(|e| eyre!("secret entry {} is not a JSON object: {}", secret_id, e))
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub terminal: TerminalInfo,
    pub conn_str_read: SecretString,
    pub conn_str_write: SecretString,
}

#[derive(Deserialize)]
struct DbConnBlob {
    user: String,
    password: String,
    host_with_port: String,
    name: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Report> {
        Self::load(&EnvSecretStore)
    }

    pub fn load(store: &dyn SecretStore) -> Result<Self, Report> {
        let secret_id =
            env::var("SECRET_ID").map_err(|_| eyre!("SECRET_ID environment variable not set"))?;
        let region =
            env::var("AWS_REGION").map_err(|_| eyre!("AWS_REGION environment variable not set"))?;

        let secret = store.fetch(&region, &secret_id)?;
        let terminal_id = secret
            .get("terminal")
            .cloned()
            .ok_or_else(|| eyre!("terminal missing from secret entry"))?;
        let terminal_password = secret
            .get("terminal-password")
            .cloned()
            .ok_or_else(|| eyre!("terminal-password missing from secret entry"))?;
        info!("Terminal credentials have been set");

        let conn_str_read = render_conn_url(&required_env("APP_DB_CONN_READ")?)?;
        let conn_str_write = render_conn_url(&required_env("APP_DB_CONN_WRITE")?)?;

        Ok(Self {
            terminal: TerminalInfo {
                terminal_id,
                terminal_password: SecretString::from(terminal_password),
            },
            conn_str_read: SecretString::from(conn_str_read),
            conn_str_write: SecretString::from(conn_str_write),
        })
    }
}

fn required_env(name: &str) -> Result<String, Report> {
    let value = env::var(name).map_err(|_| eyre!("{} environment variable not set", name))?;
    if value.is_empty() {
        return Err(eyre!("{} environment variable is empty", name));
    }
    info!("{} environment variable has been set", name);
    Ok(value)
}

/// Renders a `{user, password, host_with_port, name}` JSON blob into a
/// connection URL. `Url` takes care of percent-encoding the credentials.
fn render_conn_url(blob: &str) -> Result<String, Report> {
    let conn: DbConnBlob = serde_json::from_str(blob)
        .map_err(|e| eyre!("database connection blob is not valid JSON: {}", e))?;

    let mut url = url::Url::parse(&format!("postgres://{}/{}", conn.host_with_port, conn.name))
        .map_err(|e| eyre!("invalid database host: {}", e))?;
    url.set_username(&conn.user)
        .map_err(|_| eyre!("invalid database user"))?;
    url.set_password(Some(&conn.password))
        .map_err(|_| eyre!("invalid database password"))?;
    url.query_pairs_mut()
        .append_pair("application_name", SERVICE_NAME);

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_connection_url_from_blob() {
        let blob = r#"{"user":"app","password":"p@ss/word","host_with_port":"db.internal:5432","name":"wallets"}"#;
        let url = render_conn_url(blob).unwrap();

        assert!(url.starts_with("postgres://app:"));
        assert!(url.contains("@db.internal:5432/wallets"));
        assert!(url.contains("application_name=authex"));
        // credentials must be percent-encoded, not passed through raw
        assert!(!url.contains("p@ss/word"));
    }

    #[test]
    fn rejects_malformed_blob() {
        assert!(render_conn_url("not-json").is_err());
    }
}
