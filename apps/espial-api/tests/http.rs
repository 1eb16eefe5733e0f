use std::env;

use axum::{
	body::{self, Body},
	http::{Request, StatusCode},
};
use tower::util::ServiceExt;

use espial_api::{routes, state::AppState};

fn test_config(engine_url: &str) -> espial_config::Config {
	let raw = format!(
		r#"
		[service]
		http_bind = "127.0.0.1:0"
		log_level = "info"

		[engine]
		url        = "{engine_url}"
		index      = "experiences"
		timeout_ms = 200

		[search]
		results_per_page = 8

		[metadata]
		api_base   = "http://192.0.2.1/api/metadata/"
		timeout_ms = 200

		[mapping]
		title         = "Course.CourseTitle"
		description   = "Course.CourseShortDescription"
		code          = "Course.CourseCode"
		provider      = "Course.CourseProviderName"
		instructor    = "Course.CourseInstructor"
		delivery_mode = "Course.CourseDeliveryMode"
		competency    = "Course.CourseCompetency"
		derived_from  = "Course.DerivedFrom"
		subject       = "Course.CourseSubject"

		[fields]
		"#
	);

	toml::from_str(&raw).expect("Failed to parse test config.")
}

// TEST-NET address; offline tests never reach it.
fn offline_app() -> axum::Router {
	let state = AppState::new(test_config("http://192.0.2.1:9200"))
		.expect("Failed to initialize app state.");

	routes::router(state)
}

async fn error_body(response: axum::response::Response) -> serde_json::Value {
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&bytes).expect("Failed to parse response.")
}

#[tokio::test]
async fn health_ok() {
	let response = offline_app()
		.oneshot(
			Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn search_without_keyword_is_a_bad_request() {
	let response = offline_app()
		.oneshot(
			Request::builder()
				.uri("/api/experiences/search?page=1")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call search.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let json = error_body(response).await;

	assert_eq!(json["error_code"], "invalid_request");
}

#[tokio::test]
async fn search_with_non_numeric_page_is_a_bad_request() {
	let response = offline_app()
		.oneshot(
			Request::builder()
				.uri("/api/experiences/search?keyword=rust&page=next")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call search.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let json = error_body(response).await;

	assert_eq!(json["error_code"], "invalid_page");
}

#[tokio::test]
async fn suggest_without_any_organizations_is_not_found() {
	let response = offline_app()
		.oneshot(
			Request::builder()
				.uri("/api/suggest?partial=int")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call suggest.");

	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	let json = error_body(response).await;

	assert_eq!(json["error_code"], "not_found");
}

#[tokio::test]
async fn similar_without_keyword_is_a_bad_request() {
	let response = offline_app()
		.oneshot(
			Request::builder()
				.uri("/api/experiences/similar")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call similar.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a reachable search engine. Set ESPIAL_ENGINE_URL to run."]
async fn search_round_trip_against_live_engine() {
	let Ok(engine_url) = env::var("ESPIAL_ENGINE_URL") else {
		eprintln!("Skipping live search test; set ESPIAL_ENGINE_URL to run this test.");

		return;
	};
	let state =
		AppState::new(test_config(&engine_url)).expect("Failed to initialize app state.");
	let response = routes::router(state)
		.oneshot(
			Request::builder()
				.uri("/api/experiences/search?keyword=introduction")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call search.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = error_body(response).await;

	assert!(json["total"].is_u64());
	assert!(json["hits"].is_array());
}
