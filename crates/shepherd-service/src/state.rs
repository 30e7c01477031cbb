//! Application state.

use std::sync::Arc;

use shepherd_fermata::{ClientOptions, FermataClient};
use shepherd_identity::{FirebaseResolver, ResolverOptions};

use crate::config::ServiceConfig;
use crate::metering::Metering;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,

    /// Metering façade (absent when Fermata is not configured).
    pub metering: Option<Arc<Metering>>,
}

impl AppState {
    /// Create application state, building the Firebase resolver and the
    /// Fermata client from configuration.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        let metering = build_metering(&config).map(Arc::new);

        if metering.is_none() {
            tracing::warn!("Metering not configured - metered routes will answer 503");
        }

        Self { config, metering }
    }

    /// Create application state around an already-built façade.
    #[must_use]
    pub fn with_metering(config: ServiceConfig, metering: Metering) -> Self {
        Self {
            config,
            metering: Some(Arc::new(metering)),
        }
    }

    /// Check if metering is available.
    #[must_use]
    pub fn has_metering(&self) -> bool {
        self.metering.is_some()
    }
}

fn build_metering(config: &ServiceConfig) -> Option<Metering> {
    let credentials = config.fermata_credentials.clone()?;

    let fermata = match FermataClient::with_options(
        credentials,
        ClientOptions {
            timeout_seconds: config.fermata_timeout_seconds,
            base_url: config.fermata_api_url.clone(),
        },
    ) {
        Ok(client) => {
            tracing::info!(fermata_url = %config.fermata_api_url, "Fermata integration enabled");
            client
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create Fermata client");
            return None;
        }
    };

    let resolver = match FirebaseResolver::new(
        &config.firebase_database_url,
        ResolverOptions {
            timeout_seconds: config.firebase_timeout_seconds,
            auth_token: config.firebase_auth_token.clone(),
        },
    ) {
        Ok(resolver) => {
            tracing::info!(
                database_url = %config.firebase_database_url,
                "Firebase identity resolver enabled"
            );
            resolver
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create Firebase resolver");
            return None;
        }
    };

    Some(Metering::new(Arc::new(resolver), fermata).with_policy(config.failure_policy))
}
