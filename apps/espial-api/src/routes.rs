use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;

use espial_domain::{Organization, Requester};
use espial_service::{Params, SearchEnvelope, SearchRequest, ServiceError};

use crate::state::AppState;

/// Comma-separated organization filter values, set by the auth layer in front
/// of this service. Absent means an anonymous requester.
pub const ORG_HEADER: &str = "X-Espial-Org";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/experiences/search", get(search))
		.route("/api/experiences/similar", get(similar))
		.route("/api/experiences/{id}", get(experience))
		.route("/api/experiences/{id}/more-like-this", get(more_like_this))
		.route("/api/suggest", get(suggest))
		.route("/api/spotlight-experiences", get(spotlight_experiences))
		.route("/api/spotlight-documents", get(spotlight_documents))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SearchEnvelope>, ApiError> {
	let requester = requester_from_headers(&headers);
	let (keyword, params) = split_keyword(pairs)?;
	let request = SearchRequest { keyword, params };
	let envelope = state.service.search_by_keyword(&requester, &request).await?;

	Ok(Json(envelope))
}

async fn more_like_this(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<String>,
) -> Result<Json<SearchEnvelope>, ApiError> {
	let requester = requester_from_headers(&headers);
	let envelope = state.service.more_like_this(&requester, &id).await?;

	Ok(Json(envelope))
}

async fn similar(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SearchEnvelope>, ApiError> {
	let requester = requester_from_headers(&headers);
	let keyword = required_param(&pairs, "keyword")?;
	let envelope = state.service.similar_experiences(&requester, &keyword).await?;

	Ok(Json(envelope))
}

async fn suggest(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ApiError> {
	let requester = requester_from_headers(&headers);
	let partial = required_param(&pairs, "partial")?;
	let suggestions = state.service.suggest(&requester, &partial).await?;

	Ok(Json(suggestions))
}

async fn experience(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
	let record = state.service.experience_by_hash(&id).await?;

	Ok(Json(record))
}

async fn spotlight_experiences(
	State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, ApiError> {
	let records = state.service.spotlight_experiences().await?;

	Ok(Json(records))
}

async fn spotlight_documents(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
	let documents = state.service.spotlight_documents().await?;

	Ok(Json(documents))
}

fn requester_from_headers(headers: &HeaderMap) -> Requester {
	let organizations: Vec<Organization> = headers
		.get_all(ORG_HEADER)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|value| value.split(','))
		.map(str::trim)
		.filter(|filter| !filter.is_empty())
		.map(|filter| Organization { name: filter.to_string(), filter: filter.to_string() })
		.collect();

	if organizations.is_empty() {
		Requester::Anonymous
	} else {
		Requester::User { organizations }
	}
}

/// Splits the mandatory `keyword` out of the raw query pairs; everything else
/// stays a request parameter, multi-valued by repetition.
fn split_keyword(pairs: Vec<(String, String)>) -> Result<(String, Params), ApiError> {
	let mut keyword = None;
	let mut params = Params::new();
	for (name, value) in pairs {
		if name == "keyword" {
			keyword = Some(value);
		} else {
			params.entry(name).or_default().push(value);
		}
	}

	let Some(keyword) = keyword else {
		return Err(ServiceError::InvalidRequest {
			message: "The keyword parameter is required.".to_string(),
		}
		.into());
	};

	Ok((keyword, params))
}

fn required_param(pairs: &[(String, String)], name: &str) -> Result<String, ApiError> {
	pairs
		.iter()
		.find(|(key, _)| key == name)
		.map(|(_, value)| value.clone())
		.ok_or_else(|| {
			ServiceError::InvalidRequest { message: format!("The {name} parameter is required.") }
				.into()
		})
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let (status, error_code) = match &err {
			ServiceError::InvalidPage { .. } => (StatusCode::BAD_REQUEST, "invalid_page"),
			ServiceError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
			ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
			ServiceError::ConfigIntegrity { .. } => {
				(StatusCode::INTERNAL_SERVER_ERROR, "config_integrity")
			},
			ServiceError::Engine { .. } => (StatusCode::BAD_GATEWAY, "engine_unavailable"),
			ServiceError::Metadata { .. } => (StatusCode::BAD_GATEWAY, "metadata_unavailable"),
			ServiceError::Provider { .. } => {
				(StatusCode::INTERNAL_SERVER_ERROR, "provider_failure")
			},
		};

		Self { status, error_code: error_code.to_string(), message: err.to_string() }
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		if self.status.is_server_error() {
			tracing::error!(code = %self.error_code, message = %self.message, "Request failed.");
		}
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
