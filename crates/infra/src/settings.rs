//! Runtime settings from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

use databox_ai::DEFAULT_MODEL;

pub const BIND_ADDR_ENV: &str = "DATABOX_BIND_ADDR";
pub const DATA_DIR_ENV: &str = "DATABOX_DATA_DIR";
pub const AI_API_KEY_ENV: &str = "DATABOX_AI_API_KEY";
pub const AI_MODEL_ENV: &str = "DATABOX_AI_MODEL";
pub const SEED_CATALOG_ENV: &str = "DATABOX_SEED_CATALOG";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    /// Enrichment credential used when the operator's configuration has none.
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    pub seed_catalog: bool,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = var(BIND_ADDR_ENV)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .with_context(|| format!("{BIND_ADDR_ENV} must be a socket address"))?;

        let data_dir = var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let seed_catalog = match var(SEED_CATALOG_ENV) {
            None => true,
            Some(v) => parse_bool(&v).with_context(|| format!("{SEED_CATALOG_ENV} must be a boolean"))?,
        };

        Ok(Self {
            bind_addr,
            data_dir,
            ai_api_key: var(AI_API_KEY_ENV),
            ai_model: var(AI_MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            seed_catalog,
        })
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("databox"))
        .unwrap_or_else(|| PathBuf::from(".databox"))
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised boolean: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(s.ai_model, "gemini-3-flash-preview");
        assert_eq!(s.ai_api_key, None);
        assert!(s.seed_catalog);
        assert!(s.users_file().ends_with("users.json"));
    }

    #[test]
    fn overrides() {
        let s = settings(&[
            (BIND_ADDR_ENV, "127.0.0.1:9000"),
            (DATA_DIR_ENV, "/tmp/databox"),
            (AI_API_KEY_ENV, " env-key "),
            (SEED_CATALOG_ENV, "off"),
        ])
        .unwrap();
        assert_eq!(s.bind_addr.port(), 9000);
        assert_eq!(s.users_file(), PathBuf::from("/tmp/databox/users.json"));
        assert_eq!(s.ai_api_key.as_deref(), Some("env-key"));
        assert!(!s.seed_catalog);
    }

    #[test]
    fn blank_key_is_absent() {
        let s = settings(&[(AI_API_KEY_ENV, "   ")]).unwrap();
        assert_eq!(s.ai_api_key, None);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(settings(&[(BIND_ADDR_ENV, "nope")]).is_err());
        assert!(settings(&[(SEED_CATALOG_ENV, "maybe")]).is_err());
    }
}
