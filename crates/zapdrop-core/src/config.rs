use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BIND: &str = "127.0.0.1";
/// Seconds to wait between consecutive sends within one firing.
/// A throttle against the transport's anti-spam limits, not a resource knob.
pub const DEFAULT_SEND_DELAY_SECS: u64 = 10;

/// Top-level config (zapdrop.toml + ZAPDROP_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZapdropConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl Default for ZapdropConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            whatsapp: WhatsAppConfig::default(),
            storage: StorageConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// WhatsApp bridge collaborator. The bridge owns pairing and session
/// persistence; zapdrop only consumes its HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            bridge_url: default_bridge_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory where uploaded attachments are persisted until dispatch.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_send_delay_secs")]
    pub send_delay_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            send_delay_secs: DEFAULT_SEND_DELAY_SECS,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_bridge_url() -> String {
    "http://127.0.0.1:8466".to_string()
}
fn default_uploads_dir() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.zapdrop/uploads", home)
}
fn default_send_delay_secs() -> u64 {
    DEFAULT_SEND_DELAY_SECS
}

impl ZapdropConfig {
    /// Load config from a TOML file with ZAPDROP_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.zapdrop/zapdrop.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: ZapdropConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("ZAPDROP_").split("_"))
            .extract()
            .map_err(|e| crate::error::ZapdropError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.zapdrop/zapdrop.toml", home)
}
