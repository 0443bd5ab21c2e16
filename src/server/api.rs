//! HTTP API server implementation

use axum::{
    extract::{Json, State},
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::core::errors::TranslationError;
use crate::core::models::{LanguagePair, SUPPORTED_CODES};
use crate::core::service::TranslationService;

/// Fixed model label reported in successful responses
const MODEL_NAME: &str = "Argos Translate";

/// Application state
#[derive(Clone)]
pub struct AppState {
    service: Arc<TranslationService>,
}

impl AppState {
    /// Wrap a translation service for the HTTP layer
    pub fn new(service: Arc<TranslationService>) -> Self {
        Self { service }
    }
}

/// Root endpoint response
#[derive(Serialize)]
struct StatusResponse {
    status: String,
    supported_models: String,
    instructions: String,
}

/// Translation request body
///
/// `text` is required but modeled as an Option so its absence maps to the
/// service's own 400 instead of a framework rejection.
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    /// Text to translate
    pub text: Option<String>,
    /// Source language code, defaults to the configured pair
    pub from: Option<String>,
    /// Target language code, defaults to the configured pair
    pub to: Option<String>,
}

/// Successful translation response
#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    /// Translated text
    #[serde(rename = "translatedText")]
    pub translated_text: String,
    /// Resolved source language code
    #[serde(rename = "sourceLanguage")]
    pub source_language: String,
    /// Resolved target language code
    #[serde(rename = "targetLanguage")]
    pub target_language: String,
    /// Model label
    pub model: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

fn bad_request(message: String) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
}

/// Root status handler
async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ready".to_string(),
        supported_models: "de <-> en".to_string(),
        instructions:
            "Send a POST request to /translate with {'text': '...', 'from': 'de', 'to': 'en'}"
                .to_string(),
    })
}

/// Translation handler
async fn translate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let text = payload.text.ok_or_else(|| {
        bad_request(
            TranslationError::MissingField {
                field: "text".to_string(),
            }
            .to_string(),
        )
    })?;

    let config = state.service.config();
    let from = payload
        .from
        .unwrap_or_else(|| config.default_from.clone())
        .to_lowercase();
    let to = payload
        .to
        .unwrap_or_else(|| config.default_to.clone())
        .to_lowercase();

    let pair = LanguagePair::new(&from, &to);
    if !state.service.is_supported(&pair) {
        let code = if SUPPORTED_CODES.contains(&from.as_str()) {
            to.clone()
        } else {
            from.clone()
        };
        return Err(bad_request(
            TranslationError::UnsupportedLanguage { code }.to_string(),
        ));
    }

    match state.service.translate(&text, &from, &to).await {
        Ok(translated_text) => Ok(Json(TranslateResponse {
            translated_text,
            source_language: from,
            target_language: to,
            model: MODEL_NAME.to_string(),
        })),
        Err(e) if e.is_service_unavailable() => {
            warn!("Translation unavailable for {}: {}", pair, e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
        Err(e) => {
            warn!("Unexpected translation failure for {}: {}", pair, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "An unexpected server error occurred.".to_string(),
                }),
            ))
        }
    }
}

/// Build the router with permissive CORS on every response
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::POST]);

    Router::new()
        .route("/", get(status))
        .route("/translate", post(translate))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(
    host: String,
    port: u16,
    service: Arc<TranslationService>,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(service));
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ServiceConfig;
    use crate::core::testing::{MockEngine, MockProvider};
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    fn state_with(provider: MockProvider) -> State<Arc<AppState>> {
        let service = TranslationService::new(
            ServiceConfig::default(),
            Arc::new(provider),
            Arc::new(MockEngine::default()),
        );
        State(Arc::new(AppState::new(Arc::new(service))))
    }

    fn request(text: Option<&str>, from: Option<&str>, to: Option<&str>) -> Json<TranslateRequest> {
        Json(TranslateRequest {
            text: text.map(String::from),
            from: from.map(String::from),
            to: to.map(String::from),
        })
    }

    #[tokio::test]
    async fn test_missing_text_is_a_400() {
        let state = state_with(MockProvider::with_codes(&[("de", "en")]));

        let (status, body) = translate(state, request(None, Some("de"), Some("en")))
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("Missing 'text'"));
    }

    #[tokio::test]
    async fn test_unsupported_language_is_a_400() {
        let state = state_with(MockProvider::with_codes(&[("de", "en")]));

        for (from, to) in [(Some("fr"), Some("en")), (Some("de"), Some("ja"))] {
            let (status, body) = translate(state.clone(), request(Some("Hallo"), from, to))
                .await
                .unwrap_err();

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body.error.contains("German"));
        }
    }

    #[tokio::test]
    async fn test_successful_translation_response_shape() {
        let state = state_with(MockProvider::with_codes(&[("de", "en")]));

        let Json(response) = translate(state, request(Some("Hallo"), Some("DE"), Some("en")))
            .await
            .unwrap();

        assert_json_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "translatedText": "Hello",
                "sourceLanguage": "de",
                "targetLanguage": "en",
                "model": "Argos Translate",
            })
        );
    }

    #[tokio::test]
    async fn test_codes_default_to_configured_pair() {
        let state = state_with(MockProvider::with_codes(&[("de", "en")]));

        let Json(response) = translate(state, request(Some("Hallo"), None, None))
            .await
            .unwrap();

        assert_eq!(response.source_language, "de");
        assert_eq!(response.target_language, "en");
        assert_eq!(response.translated_text, "Hello");
    }

    #[tokio::test]
    async fn test_unavailable_model_is_a_503() {
        // Empty index: the lazy install fallback cannot find a package
        let state = state_with(MockProvider::empty());

        let (status, body) = translate(state, request(Some("Hallo"), Some("de"), Some("en")))
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.error.contains("de->en"));
    }

    #[tokio::test]
    async fn test_status_endpoint_reports_ready() {
        let Json(response) = status().await;
        assert_eq!(response.status, "ready");
        assert_eq!(response.supported_models, "de <-> en");
        assert!(response.instructions.contains("/translate"));
    }
}
