//! Country data service
//!
//! Queries the provider and reshapes each record into the reduced
//! `Country` form. A provider 404 becomes a `NotFound` with a
//! query-specific message; transport and payload failures stay
//! `Upstream` and are reported generically to clients.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::country::Country;
use crate::domain::DomainError;

use super::client::CountriesClient;

/// Service for provider queries
#[derive(Debug)]
pub struct CountriesService {
    client: Arc<dyn CountriesClient>,
}

impl CountriesService {
    /// Create a new countries service
    pub fn new(client: Arc<dyn CountriesClient>) -> Self {
        Self { client }
    }

    /// All countries
    pub async fn get_all(&self) -> Result<Vec<Country>, DomainError> {
        let value = self.client.get_json("all").await?;
        to_countries(value)
    }

    /// Countries matching a name
    pub async fn get_by_name(&self, name: &str) -> Result<Vec<Country>, DomainError> {
        let value = self
            .client
            .get_json(&format!("name/{}", name))
            .await
            .map_err(|e| not_found_as(e, format!("Country not found: {}", name)))?;

        let countries = to_countries(value)?;

        if countries.is_empty() {
            return Err(DomainError::not_found(format!("Country not found: {}", name)));
        }

        Ok(countries)
    }

    /// Countries using a currency
    pub async fn get_by_currency(&self, code: &str) -> Result<Vec<Country>, DomainError> {
        let value = self
            .client
            .get_json(&format!("currency/{}", code))
            .await
            .map_err(|e| {
                not_found_as(e, format!("No countries found with currency: {}", code))
            })?;

        to_countries(value)
    }

    /// Countries speaking a language
    pub async fn get_by_language(&self, code: &str) -> Result<Vec<Country>, DomainError> {
        let value = self
            .client
            .get_json(&format!("lang/{}", code))
            .await
            .map_err(|e| {
                not_found_as(e, format!("No countries found with language: {}", code))
            })?;

        to_countries(value)
    }

    /// Countries in a region
    pub async fn get_by_region(&self, region: &str) -> Result<Vec<Country>, DomainError> {
        let value = self
            .client
            .get_json(&format!("region/{}", region))
            .await
            .map_err(|e| not_found_as(e, format!("No countries found in region: {}", region)))?;

        to_countries(value)
    }
}

fn to_countries(value: Value) -> Result<Vec<Country>, DomainError> {
    let records = value.as_array().ok_or_else(|| {
        DomainError::upstream("Country provider returned an unexpected payload shape")
    })?;

    Ok(records.iter().map(Country::from_provider).collect())
}

fn not_found_as(error: DomainError, message: String) -> DomainError {
    match error {
        DomainError::NotFound { .. } => DomainError::not_found(message),
        other => other,
    }
}
