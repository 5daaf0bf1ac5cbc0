use axum::{
    Json,
    extract::{OriginalUri, Path, Query, State, rejection::{JsonRejection, QueryRejection}},
    http::{HeaderMap, StatusCode, header::HOST},
};
use brainwave::{
    ApiError, CRUDResource, ErrorResponse, SearchQuery, SearchResult, validate_search,
};
use url::Url;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::entities::{Thought, ThoughtCreate, ThoughtUpdate};
use crate::state::AppState;

/// Absolute URL of the current request, as the client addressed it.
fn request_url(headers: &HeaderMap, uri: &axum::http::Uri) -> Result<Url, ApiError> {
    let host = headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    let path = uri.path_and_query().map_or("/", |pq| pq.as_str());

    Url::parse(&format!("{scheme}://{host}{path}"))
        .map_err(|e| ApiError::bad_request(format!("Invalid request URL: {e}")))
}

#[utoipa::path(
    get,
    path = "/thoughts",
    tag = "thoughts",
    security(("bearer" = [])),
    params(SearchQuery),
    description = "Search the caller's thoughts.\n\n\
        Filterable fields: title, status, nextReminder, lastFollowUp, createdAt, updatedAt.\n\n\
        Orderable fields: title, status, nextReminder, createdAt, updatedAt (default updatedAt:desc).\n\n\
        `search` looks for the text in the title and body.",
    responses(
        (status = 200, description = "One page of matching thoughts", body = SearchResult<Thought>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Invalid search parameters", body = ErrorResponse)
    )
)]
pub async fn search(
    State(state): State<AppState>,
    caller: AuthUser,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResult<Thought>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::invalid("query", rejection.body_text()))?;
    let request = validate_search(
        &query,
        &state.config.search_config(),
        &Thought::filter_fields(),
        &Thought::order_fields(),
        Thought::DEFAULT_ORDER_FIELD,
    )?;
    let url = request_url(&headers, &uri)?;

    let result = Thought::search(&state.db, caller.id, &request, &url).await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/thoughts",
    tag = "thoughts",
    security(("bearer" = [])),
    request_body = ThoughtCreate,
    responses(
        (status = 201, description = "Thought created", body = Thought),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    payload: Result<Json<ThoughtCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Thought>), ApiError> {
    let Json(input) = payload?;
    let input = input.validated(&state.config.thought_limits())?;

    let thought = Thought::create(&state.db, caller.id, input).await?;
    tracing::debug!(thought_id = %thought.id, user_id = %caller.id, "Created thought");
    Ok((StatusCode::CREATED, Json(thought)))
}

#[utoipa::path(
    get,
    path = "/thoughts/{id}",
    tag = "thoughts",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Thought id")),
    responses(
        (status = 200, description = "The thought", body = Thought),
        (status = 404, description = "No such thought for this user", body = ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Thought>, ApiError> {
    let thought = Thought::get_one(&state.db, caller.id, id)
        .await
        .map_err(|err| not_found_with_id(err, id))?;
    Ok(Json(thought))
}

#[utoipa::path(
    patch,
    path = "/thoughts/{id}",
    tag = "thoughts",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Thought id")),
    request_body = ThoughtUpdate,
    responses(
        (status = 200, description = "The updated thought", body = Thought),
        (status = 404, description = "No such thought for this user", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<ThoughtUpdate>, JsonRejection>,
) -> Result<Json<Thought>, ApiError> {
    let Json(input) = payload?;
    let input = input.validated(&state.config.thought_limits())?;

    let thought = Thought::update(&state.db, caller.id, id, input)
        .await
        .map_err(|err| not_found_with_id(err, id))?;
    tracing::debug!(thought_id = %thought.id, "Updated thought");
    Ok(Json(thought))
}

#[utoipa::path(
    delete,
    path = "/thoughts/{id}",
    tag = "thoughts",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Thought id")),
    responses(
        (status = 200, description = "The deleted thought", body = Thought),
        (status = 404, description = "No such thought for this user", body = ErrorResponse)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Thought>, ApiError> {
    let thought = Thought::delete(&state.db, caller.id, id)
        .await
        .map_err(|err| not_found_with_id(err, id))?;
    tracing::debug!(thought_id = %thought.id, "Deleted thought");
    Ok(Json(thought))
}

fn not_found_with_id(err: sea_orm::DbErr, id: Uuid) -> ApiError {
    match err {
        sea_orm::DbErr::RecordNotFound(_) => {
            ApiError::not_found(Thought::RESOURCE_NAME_SINGULAR, Some(id.to_string()))
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Uri};

    #[test]
    fn test_request_url_uses_host_and_forwarded_proto() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("api.example.com"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        let uri: Uri = "/thoughts?page=2&size=10".parse().unwrap();

        let url = request_url(&headers, &uri).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/thoughts?page=2&size=10");
    }

    #[test]
    fn test_request_url_defaults() {
        let uri: Uri = "/thoughts".parse().unwrap();
        let url = request_url(&HeaderMap::new(), &uri).unwrap();
        assert_eq!(url.as_str(), "http://localhost/thoughts");
    }
}
