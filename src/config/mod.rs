use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
    #[serde(default)]
    academy: Academy,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

/// Which backend holds the progress snapshot and the certificate counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize)]
pub struct App {
    jwt: String,
    #[serde(default)]
    database_uri: String,
    #[serde(default)]
    docs: bool,
    #[serde(default = "default_storage")]
    storage: StorageKind,
    public_origin: String,
    #[serde(default)]
    admin_emails: Vec<String>,
    #[serde(default = "default_request_timeout")]
    request_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Academy {
    #[serde(default = "default_passing_score")]
    passing_score: u32,
    #[serde(default = "default_cert_prefix")]
    cert_prefix: String,
}

fn default_storage() -> StorageKind {
    StorageKind::Postgres
}

fn default_request_timeout() -> u64 {
    15
}

fn default_passing_score() -> u32 {
    crate::academy::DEFAULT_PASSING_SCORE
}

fn default_cert_prefix() -> String {
    String::from(crate::academy::DEFAULT_CERT_PREFIX)
}

impl Default for Academy {
    fn default() -> Self {
        Self {
            passing_score: default_passing_score(),
            cert_prefix: default_cert_prefix(),
        }
    }
}

impl Config {
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let read_cfg = |use_local| -> ConfigResult<Self> {
                    let bytes = read_config(use_local)?;
                    let config: Self = toml::from_slice(&bytes)?;
                    Ok(config)
                };

                match read_cfg(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        if !matches!(e, error::ConfigError::ConfigNotFound) {
                            crate::error::log_error(&e);
                        }
                        tracing::error!("Config not found.");
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }

    #[inline]
    pub fn academy(&self) -> &Academy {
        &self.academy
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }

    #[inline]
    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    /// Origin used to build public verification links, without trailing slash.
    #[inline]
    pub fn public_origin(&self) -> &str {
        self.public_origin.trim_end_matches('/')
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails
            .iter()
            .any(|admin| admin.trim().to_lowercase() == email)
    }

    #[inline]
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

impl Academy {
    #[inline]
    pub fn passing_score(&self) -> u32 {
        self.passing_score
    }

    #[inline]
    pub fn cert_prefix(&self) -> &str {
        &self.cert_prefix
    }
}
