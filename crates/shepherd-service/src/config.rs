//! Service configuration.

use std::path::Path;

use shepherd_fermata::{FermataCredentials, DEFAULT_BASE_URL};

use crate::metering::FailurePolicy;

/// Default Firebase Realtime Database holding user subscriptions.
pub const DEFAULT_FIREBASE_DATABASE_URL: &str =
    "https://shepherd-app-382114-default-rtdb.firebaseio.com";

/// Service configuration loaded from environment variables.
#[derive(Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Fermata credentials. Metering is disabled without them.
    pub fermata_credentials: Option<FermataCredentials>,

    /// Fermata API base URL.
    pub fermata_api_url: String,

    /// Timeout for Fermata calls in seconds.
    pub fermata_timeout_seconds: u64,

    /// Firebase Realtime Database URL.
    pub firebase_database_url: String,

    /// Firebase database secret or ID token (optional).
    pub firebase_auth_token: Option<String>,

    /// Timeout for Firebase calls in seconds.
    pub firebase_timeout_seconds: u64,

    /// What the balance gate does when Fermata is unreachable.
    pub failure_policy: FailurePolicy,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("listen_addr", &self.listen_addr)
            .field("fermata_credentials", &self.fermata_credentials)
            .field("fermata_api_url", &self.fermata_api_url)
            .field("fermata_timeout_seconds", &self.fermata_timeout_seconds)
            .field("firebase_database_url", &self.firebase_database_url)
            .field(
                "firebase_auth_token",
                &self.firebase_auth_token.as_ref().map(|_| "<redacted>"),
            )
            .field("firebase_timeout_seconds", &self.firebase_timeout_seconds)
            .field("failure_policy", &self.failure_policy)
            .field("cors_origins", &self.cors_origins)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup_with_secrets(|key| std::env::var(key).ok(), &SECRET_PATHS)
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// No secrets file is consulted.
    #[must_use]
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let no_secrets: [&str; 0] = [];
        Self::from_lookup_with_secrets(var, &no_secrets)
    }

    /// Load configuration, taking Fermata credentials from the first readable
    /// file in `secret_paths` before falling back to variables.
    #[must_use]
    pub fn from_lookup_with_secrets<P: AsRef<Path>>(
        var: impl Fn(&str) -> Option<String>,
        secret_paths: &[P],
    ) -> Self {
        let defaults = Self::default();

        // Secrets file first, then environment variables
        let fermata_credentials = load_fermata_secrets(secret_paths).or_else(|| {
            tracing::debug!("Fermata secrets file not found, using environment variables");
            var("FERMATA_COMPANY_ID")
                .zip(var("FERMATA_API_KEY"))
                .map(|(company_id, api_key)| FermataCredentials::new(company_id, api_key))
        });

        let policy_var = var("METERING_FAILURE_POLICY");
        let failure_policy = match policy_var.map(|s| s.parse::<FailurePolicy>()) {
            Some(Ok(policy)) => policy,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Ignoring METERING_FAILURE_POLICY");
                defaults.failure_policy
            }
            None => defaults.failure_policy,
        };

        Self {
            listen_addr: var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            fermata_credentials,
            fermata_api_url: var("FERMATA_API_URL").unwrap_or(defaults.fermata_api_url),
            fermata_timeout_seconds: parse_or(
                var("FERMATA_TIMEOUT_SECONDS"),
                defaults.fermata_timeout_seconds,
            ),
            firebase_database_url: var("FIREBASE_DATABASE_URL")
                .unwrap_or(defaults.firebase_database_url),
            firebase_auth_token: var("FIREBASE_AUTH_TOKEN"),
            firebase_timeout_seconds: parse_or(
                var("FIREBASE_TIMEOUT_SECONDS"),
                defaults.firebase_timeout_seconds,
            ),
            failure_policy,
            cors_origins: var("CORS_ORIGINS").map_or(defaults.cors_origins, |s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            }),
            max_body_bytes: parse_or(var("MAX_BODY_BYTES"), defaults.max_body_bytes),
            request_timeout_seconds: parse_or(
                var("REQUEST_TIMEOUT_SECONDS"),
                defaults.request_timeout_seconds,
            ),
        }
    }

    /// Whether Fermata credentials are present.
    #[must_use]
    pub fn has_fermata(&self) -> bool {
        self.fermata_credentials.is_some()
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

/// Default locations of the Fermata secrets file.
pub const SECRET_PATHS: [&str; 2] = [".secrets/fermata.json", "../.secrets/fermata.json"];

/// Load Fermata credentials from the first readable secrets file.
fn load_fermata_secrets<P: AsRef<Path>>(secret_paths: &[P]) -> Option<FermataCredentials> {
    for path in secret_paths {
        let path = path.as_ref();
        if let Ok(secrets) = load_secrets_file::<FermataCredentials>(path) {
            tracing::info!(path = %path.display(), "Loaded Fermata secrets from file");
            return Some(secrets);
        }
    }

    None
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<T, std::io::Error> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
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
            fermata_credentials: None,
            fermata_api_url: DEFAULT_BASE_URL.into(),
            fermata_timeout_seconds: 30,
            firebase_database_url: DEFAULT_FIREBASE_DATABASE_URL.into(),
            firebase_auth_token: None,
            firebase_timeout_seconds: 30,
            failure_policy: FailurePolicy::Closed,
            cors_origins: vec![
                "https://dev--shepherd-tutors.netlify.app".into(),
                "http://localhost:3000".into(),
                "http://localhost:3001".into(),
            ],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
