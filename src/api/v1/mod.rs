//! Machine-client v1 API endpoints

pub mod countries;

use axum::{middleware, routing::get, Router};
use serde_json::{json, Value};

use super::middleware::require_api_key;
use super::state::AppState;
use super::types::Json;

/// Create the v1 API router. Country routes sit behind the API-key
/// middleware; the docs route is public.
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/countries", get(countries::list_countries))
        .route("/countries/{name}", get(countries::get_by_name))
        .route("/countries/currency/{code}", get(countries::get_by_currency))
        .route("/countries/language/{code}", get(countries::get_by_language))
        .route("/countries/region/{region}", get(countries::get_by_region))
        .route_layer(middleware::from_fn_with_state(state, require_api_key));

    Router::new().route("/docs", get(api_docs)).merge(protected)
}

/// Static API description
///
/// GET /api/v1/docs
pub async fn api_docs() -> Json<Value> {
    Json(json!({
        "name": "Countries API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Filtered country data from the RestCountries provider",
        "authentication": "API key via 'X-API-Key' header or 'api_key' query parameter",
        "endpoints": [
            {
                "path": "/api/v1/countries",
                "method": "GET",
                "description": "All countries",
                "params": {
                    "page": "Page number (default: 1)",
                    "per_page": "Items per page (default: 20, max: 100)"
                }
            },
            {
                "path": "/api/v1/countries/{name}",
                "method": "GET",
                "description": "Countries matching a name"
            },
            {
                "path": "/api/v1/countries/currency/{code}",
                "method": "GET",
                "description": "Countries using a currency"
            },
            {
                "path": "/api/v1/countries/language/{code}",
                "method": "GET",
                "description": "Countries speaking a language"
            },
            {
                "path": "/api/v1/countries/region/{region}",
                "method": "GET",
                "description": "Countries in a region"
            }
        ]
    }))
}
