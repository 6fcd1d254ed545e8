//! Service configuration.

use serde::Deserialize;
use std::path::Path;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to the `RocksDB` data directory (default: "/data/billbook").
    pub data_dir: String,

    /// Login PIN to seed into the store if none is configured yet.
    pub login_pin: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Company letterhead details for rendered invoices.
    pub company: CompanyProfile,
}

/// Company details printed on invoice PDFs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyProfile {
    /// Registered company name.
    pub name: String,
    /// Registered address.
    pub address: String,
    /// GST identification number.
    pub gstin: String,
    /// State of registration.
    pub state: String,
    /// Numeric GST state code.
    pub state_code: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and the company
    /// profile file.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/billbook".into()),
            login_pin: std::env::var("LOGIN_PIN").ok(),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            company: load_company_profile(),
        }
    }
}

/// Load the company profile from file or environment.
fn load_company_profile() -> CompanyProfile {
    // Try multiple paths for the profile file
    let profile_paths = [
        "company.json",
        ".config/company.json",
        "/etc/billbook/company.json",
    ];

    for path in &profile_paths {
        if let Ok(profile) = load_profile_file::<CompanyProfile>(path) {
            tracing::info!(path = %path, "Loaded company profile from file");
            return profile;
        }
    }

    // Fall back to environment variables
    tracing::debug!("Company profile file not found, using environment variables");
    let profile = CompanyProfile {
        name: std::env::var("COMPANY_NAME").unwrap_or_default(),
        address: std::env::var("COMPANY_ADDRESS").unwrap_or_default(),
        gstin: std::env::var("COMPANY_GSTIN").unwrap_or_default(),
        state: std::env::var("COMPANY_STATE").unwrap_or_default(),
        state_code: std::env::var("COMPANY_STATE_CODE").unwrap_or_default(),
    };

    if profile.name.is_empty() {
        tracing::warn!("Company profile not configured - invoice PDFs will have a blank letterhead");
    }

    profile
}

/// Load a profile from a JSON file.
fn load_profile_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Profile file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/billbook".into(),
            login_pin: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            company: CompanyProfile::default(),
        }
    }
}
