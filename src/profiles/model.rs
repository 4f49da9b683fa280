//! Data model for the Cloud Profile Vault (spec.md §3): providers,
//! profile metadata, per-provider credential shapes, and the global
//! default-profile config.
use crate::error::{Result, ToolboxError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Aws, Provider::Azure, Provider::Gcp];

    pub fn as_dir(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::Gcp => "gcp",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_dir())
    }
}

impl FromStr for Provider {
    type Err = ToolboxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "aws" => Ok(Provider::Aws),
            "azure" => Ok(Provider::Azure),
            "gcp" => Ok(Provider::Gcp),
            other => Err(ToolboxError::InvalidProvider(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    Encrypted,
    Open,
}

impl Default for TokenStorage {
    fn default() -> Self {
        TokenStorage::Encrypted
    }
}

/// Plaintext-on-disk profile metadata. Never holds secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub provider: Provider,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub role_id: Option<String>,
    #[serde(default)]
    pub token_storage: TokenStorage,
    #[serde(default)]
    pub default: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// A new, unstamped profile draft. `AddProfile` fills in `created_at`
    /// and `token_storage` (spec.md §4.3 step 3).
    pub fn draft(name: impl Into<String>, provider: Provider) -> Self {
        Self {
            name: name.into(),
            provider,
            region: None,
            account_id: None,
            role_id: None,
            token_storage: TokenStorage::Encrypted,
            default: false,
            created_at: Utc::now(),
            last_used_at: None,
        }
    }
}

// ── Credentials ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default)]
    pub session_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub subscription_id: String,
}

fn default_gcp_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_gcp_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Mirrors the fields of a GCP service-account JSON key file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcpCredentials {
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_gcp_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_gcp_token_uri")]
    pub token_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum Credentials {
    Aws(AwsCredentials),
    Azure(AzureCredentials),
    Gcp(GcpCredentials),
}

impl Credentials {
    pub fn provider(&self) -> Provider {
        match self {
            Credentials::Aws(_) => Provider::Aws,
            Credentials::Azure(_) => Provider::Azure,
            Credentials::Gcp(_) => Provider::Gcp,
        }
    }
}

// ── Global config (provider → default profile name) ───────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    default_profiles: std::collections::HashMap<String, String>,
}

impl GlobalConfig {
    pub fn get_default(&self, provider: Provider) -> Option<&str> {
        self.default_profiles.get(provider.as_dir()).map(|s| s.as_str())
    }

    pub fn set_default(&mut self, provider: Provider, name: &str) {
        self.default_profiles
            .insert(provider.as_dir().to_string(), name.to_string());
    }

    pub fn clear_default(&mut self, provider: Provider) {
        self.default_profiles.remove(provider.as_dir());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_round_trips_through_str() {
        for p in Provider::ALL {
            let s = p.to_string();
            assert_eq!(Provider::from_str(&s).unwrap(), p);
        }
        assert!(Provider::from_str("openstack").is_err());
    }

    #[test]
    fn credentials_provider_matches_variant() {
        let creds = Credentials::Aws(AwsCredentials {
            access_key_id: "AKIA".into(),
            secret_access_key: "secret".into(),
            session_token: None,
        });
        assert_eq!(creds.provider(), Provider::Aws);
    }

    #[test]
    fn global_config_default_tracking() {
        let mut cfg = GlobalConfig::default();
        assert_eq!(cfg.get_default(Provider::Aws), None);
        cfg.set_default(Provider::Aws, "prod");
        assert_eq!(cfg.get_default(Provider::Aws), Some("prod"));
        cfg.clear_default(Provider::Aws);
        assert_eq!(cfg.get_default(Provider::Aws), None);
    }
}
