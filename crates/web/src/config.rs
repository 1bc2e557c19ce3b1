//! Server settings, read from the environment

use std::path::PathBuf;

use chess_duel_core::{EngineConfig, Result};

pub const ADDR_VAR: &str = "CHESS_DUEL_ADDR";
pub const DB_VAR: &str = "CHESS_DUEL_DB";
pub const CONFIG_VAR: &str = "CHESS_DUEL_CONFIG";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub db_path: PathBuf,
    pub engine: EngineConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset or blank variables fall back to defaults. The engine file is
    /// only read when its variable is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let engine = match var(CONFIG_VAR) {
            Some(path) => EngineConfig::from_file(path.trim())?,
            None => EngineConfig::default(),
        };

        Ok(Self {
            addr: var(ADDR_VAR).unwrap_or_else(|| "127.0.0.1:3000".to_string()),
            db_path: var(DB_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("chess_duel.db")),
            engine,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr, "127.0.0.1:3000");
        assert_eq!(config.db_path, PathBuf::from("chess_duel.db"));
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ADDR_VAR, "0.0.0.0:8080"),
            (DB_VAR, "/tmp/duel.db"),
            (CONFIG_VAR, "  "),
        ]))
        .unwrap();
        assert_eq!(config.addr, "0.0.0.0:8080");
        assert_eq!(config.db_path, PathBuf::from("/tmp/duel.db"));
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_missing_engine_file_is_an_error() {
        let result = ServerConfig::from_lookup(lookup(&[(CONFIG_VAR, "/nonexistent/engine.json")]));
        assert!(result.is_err());
    }
}
