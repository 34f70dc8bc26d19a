use crate::api::auth::AuthUser;
use crate::api::response::ApiResponse;
use crate::api::SharedState;
use crate::domain::model::{provided, FeedRecord, SearchCriteria, SearchResult};
use crate::utils::error::{AppError, Result};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

type SearchResponse = Json<ApiResponse<Vec<FeedRecord>>>;

/// Optional override of a preset target: `?value=...`.
#[derive(Debug, Default, Deserialize)]
pub struct PresetQuery {
    pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExactQuery {
    pub field: Option<String>,
    pub value: Option<String>,
}

type QueryParams<T> = std::result::Result<Query<T>, QueryRejection>;

/// Query string failures (e.g. a repeated parameter) go through the error envelope.
fn query_params<T>(query: QueryParams<T>) -> Result<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

fn respond(result: SearchResult) -> SearchResponse {
    let count = result.count();
    Json(ApiResponse::success(result.records).with_count(count))
}

pub async fn search(
    _user: AuthUser,
    State(state): State<SharedState>,
    criteria: QueryParams<SearchCriteria>,
) -> Result<SearchResponse> {
    let criteria = query_params(criteria)?;
    let result = state.engine.search_criteria(&criteria).await?;
    Ok(respond(result))
}

pub async fn search_by_name(
    _user: AuthUser,
    State(state): State<SharedState>,
    query: QueryParams<PresetQuery>,
) -> Result<SearchResponse> {
    let query = query_params(query)?;
    let fields = state.engine.fields();
    let target = provided(&query.value).unwrap_or(fields.presets.name.as_str());
    let result = state.engine.search_exact(&fields.name_field, target).await?;
    Ok(respond(result))
}

pub async fn search_by_nim(
    _user: AuthUser,
    State(state): State<SharedState>,
    query: QueryParams<PresetQuery>,
) -> Result<SearchResponse> {
    let query = query_params(query)?;
    let fields = state.engine.fields();
    let target = provided(&query.value).unwrap_or(fields.presets.nim.as_str());
    let result = state.engine.search_exact(&fields.nim_field, target).await?;
    Ok(respond(result))
}

pub async fn search_by_ymd(
    _user: AuthUser,
    State(state): State<SharedState>,
    query: QueryParams<PresetQuery>,
) -> Result<SearchResponse> {
    let query = query_params(query)?;
    let fields = state.engine.fields();
    let target = provided(&query.value).unwrap_or(fields.presets.ymd.as_str());
    let result = state.engine.search_exact(&fields.ymd_field, target).await?;
    Ok(respond(result))
}

/// `?field=<column>&value=<target>`; `field` falls back to the identifier column.
pub async fn search_exact(
    _user: AuthUser,
    State(state): State<SharedState>,
    query: QueryParams<ExactQuery>,
) -> Result<SearchResponse> {
    let query = query_params(query)?;
    let field = provided(&query.field).unwrap_or(state.engine.fields().nim_field.as_str());
    let result = state
        .engine
        .search_by_param(field, provided(&query.value))
        .await?;
    Ok(respond(result))
}
