use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Server/pipeline configuration. Defaults mirror the reference deployment;
/// a TOML file passed with `--config` overrides them field by field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP bind address for `serve`.
    pub bind: String,
    /// SQLite database path; in-memory store when unset.
    pub db_path: Option<PathBuf>,
    /// Generative model identifier.
    pub model: String,
    /// Base URL of the Generative Language API.
    pub api_base: String,
    /// Upstream request timeout.
    pub timeout_secs: u64,
    /// When set, each request's prompt blocks and raw response are saved
    /// under `<artifacts_dir>/<request-id>/` for debugging.
    pub artifacts_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3001".into(),
            db_path: None,
            model: "gemma-3-27b-it".into(),
            api_base: "https://generativelanguage.googleapis.com".into(),
            timeout_secs: 120,
            artifacts_dir: None,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let text = fs_err::read_to_string(p)?;
                Ok(toml::from_str(&text)?)
            }
            None => Ok(Self::default()),
        }
    }

    /// The upstream credential. Absence is not fatal at startup: requests
    /// fail individually with a configuration error, like the reference
    /// server.
    pub fn api_key() -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.bind, "0.0.0.0:3001");
        assert_eq!(cfg.model, "gemma-3-27b-it");
        assert!(cfg.db_path.is_none());
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "bind = \"127.0.0.1:9000\"\ndb_path = \"plans.db\"").unwrap();
        let cfg = Config::load(Some(f.path())).unwrap();
        assert_eq!(cfg.bind, "127.0.0.1:9000");
        assert_eq!(cfg.db_path.as_deref(), Some(Path::new("plans.db")));
        assert_eq!(cfg.model, "gemma-3-27b-it");
    }
}
