//! Country data endpoints
//!
//! All routes here sit behind the API-key middleware; handlers only
//! query the provider, reshape, and paginate.

use axum::extract::{Path, Query, State};

use crate::api::state::AppState;
use crate::api::types::{paginate, sanitize, ApiError, Json, PageParams, Paginated};
use crate::domain::country::Country;

const MAX_PATH_PARAM_LENGTH: usize = 500;

/// Get all countries, paginated
///
/// GET /api/v1/countries
pub async fn list_countries(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<Country>>, ApiError> {
    let countries = state.countries.get_all().await?;

    Ok(Json(paginate(countries, &params)))
}

/// Get countries matching a name
///
/// GET /api/v1/countries/{name}
pub async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Country>>, ApiError> {
    let name = sanitize_path_param(&name);

    let countries = state.countries.get_by_name(&name).await?;

    Ok(Json(countries))
}

/// Get countries using a currency, paginated
///
/// GET /api/v1/countries/currency/{code}
pub async fn get_by_currency(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<Country>>, ApiError> {
    let code = sanitize_path_param(&code);

    let countries = state.countries.get_by_currency(&code).await?;

    Ok(Json(paginate(countries, &params)))
}

/// Get countries speaking a language, paginated
///
/// GET /api/v1/countries/language/{code}
pub async fn get_by_language(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<Country>>, ApiError> {
    let code = sanitize_path_param(&code);

    let countries = state.countries.get_by_language(&code).await?;

    Ok(Json(paginate(countries, &params)))
}

/// Get countries in a region, paginated
///
/// GET /api/v1/countries/region/{region}
pub async fn get_by_region(
    State(state): State<AppState>,
    Path(region): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<Country>>, ApiError> {
    let region = sanitize_path_param(&region);

    let countries = state.countries.get_by_region(&region).await?;

    Ok(Json(paginate(countries, &params)))
}

fn sanitize_path_param(input: &str) -> String {
    sanitize(input, MAX_PATH_PARAM_LENGTH)
}
