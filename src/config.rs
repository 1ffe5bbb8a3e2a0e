use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;

/// What to do when the backing file exists but cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Log the failure and treat the store as empty.
    #[default]
    Empty,
    /// Surface `CorruptStore` to every caller; the file is left untouched.
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data_dir: PathBuf,
    pub file_name: String,
    pub listen_addr: String,
    pub loglevel: String,
    pub on_corrupt: CorruptPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_name: "gastos.csv".to_string(),
            listen_addr: "0.0.0.0:5000".to_string(),
            loglevel: "info".to_string(),
            on_corrupt: CorruptPolicy::Empty,
        }
    }
}

impl Config {
    /// Defaults overridden by `GASTOS_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed("GASTOS_"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// Full path of the expense file.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

/// Process-wide configuration; falls back to defaults if the environment is invalid.
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| match Config::load() {
    Ok(cfg) => cfg,
    Err(e) => {
        eprintln!("invalid GASTOS_* configuration, using defaults: {e}");
        Config::default()
    }
});
