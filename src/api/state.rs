//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::account::AccountService;
use crate::infrastructure::api_key::ApiKeyService;
use crate::infrastructure::auth::SessionTokenService;
use crate::infrastructure::countries::CountriesService;
use crate::infrastructure::usage::UsageService;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub api_keys: Arc<ApiKeyService>,
    pub usage: Arc<UsageService>,
    pub session_tokens: Arc<SessionTokenService>,
    pub countries: Arc<CountriesService>,
}

impl AppState {
    /// Create new application state with the provided services
    pub fn new(
        accounts: Arc<AccountService>,
        api_keys: Arc<ApiKeyService>,
        usage: Arc<UsageService>,
        session_tokens: Arc<SessionTokenService>,
        countries: Arc<CountriesService>,
    ) -> Self {
        Self {
            accounts,
            api_keys,
            usage,
            session_tokens,
            countries,
        }
    }
}
