use std::time::Duration;

use async_trait::async_trait;
use lexique_config::translator::TranslatorConfig;
use lexique_translator::{ProviderMetadata, TranslateError, Translator};
use serde::{Deserialize, Serialize};

/// Google Gemini `generateContent` client
#[derive(Clone)]
pub struct GeminiTranslator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
    generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: &'a GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl GeminiTranslator {
    pub fn new(api_key: String, api_url: String, model: String) -> Result<Self, TranslateError> {
        Self::from_config(&TranslatorConfig {
            api_key,
            api_url,
            model,
            ..TranslatorConfig::default()
        })
    }

    pub fn from_config(config: &TranslatorConfig) -> Result<Self, TranslateError> {
        Ok(Self {
            client: build_client(Duration::from_secs(config.timeout_seconds))?,
            api_key: config.api_key.trim().to_string(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            generation: GenerationConfig {
                temperature: config.temperature,
                top_p: config.top_p,
                top_k: config.top_k,
                response_mime_type: config.json_mode.then_some("application/json"),
            },
        })
    }

    /// Bound every request to `timeout`
    pub fn with_timeout(self, timeout: Duration) -> Result<Self, TranslateError> {
        Ok(Self {
            client: build_client(timeout)?,
            ..self
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model)
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, TranslateError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| TranslateError::ApiError(format!("Failed to build HTTP client: {}", e)))
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn generate(&self, prompt: &str) -> Result<String, TranslateError> {
        if self.api_key.is_empty() {
            return Err(TranslateError::MissingCredential);
        }

        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: &self.generation,
        };

        tracing::debug!(model = %self.model, "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if status == 401 || status == 403 {
            return Err(TranslateError::AuthenticationError);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());

            return Err(TranslateError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let json: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                TranslateError::Timeout
            } else {
                TranslateError::ApiError(format!("Failed to parse response: {}", e))
            }
        })?;

        let text: String = json
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(TranslateError::EmptyResponse);
        }

        Ok(text)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Gemini".to_string(),
            model: self.model.clone(),
            requires_api_key: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use serde_json::{Value, json};

    use super::*;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1beta")
    }

    async fn respond_with(status: StatusCode, body: Value) -> String {
        serve(Router::new().fallback(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }))
        .await
    }

    fn translator(url: String) -> GeminiTranslator {
        GeminiTranslator::new("test-key".to_string(), url, "gemini-test".to_string()).unwrap()
    }

    #[tokio::test]
    async fn joins_candidate_parts() {
        let app = Router::new().fallback(|uri: Uri, headers: HeaderMap, Json(body): Json<Value>| async move {
            let authorized = headers.get("x-goog-api-key").is_some_and(|v| v == "test-key");
            let routed = uri.path() == "/v1beta/models/gemini-test:generateContent";
            let prompt = body["contents"][0]["parts"][0]["text"].as_str() == Some("Define chat");
            let json_mode = body["generationConfig"]["responseMimeType"] == "application/json";

            if !(authorized && routed && prompt && json_mode) {
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": { "message": "bad request" } })));
            }

            (
                StatusCode::OK,
                Json(json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": "{\"french_word\":" }, { "text": "\"chat\"}" }] }
                    }]
                })),
            )
        });
        let url = serve(app).await;

        let text = translator(url).generate("Define chat").await.unwrap();
        assert_eq!(text, r#"{"french_word":"chat"}"#);
    }

    #[tokio::test]
    async fn missing_key_makes_no_request() {
        let translator = GeminiTranslator::new(
            "  ".to_string(),
            "http://127.0.0.1:9".to_string(),
            "gemini-test".to_string(),
        )
        .unwrap();
        assert!(matches!(
            translator.generate("chat").await,
            Err(TranslateError::MissingCredential)
        ));
    }

    #[tokio::test]
    async fn maps_error_statuses() {
        let url = respond_with(StatusCode::TOO_MANY_REQUESTS, json!({})).await;
        assert!(matches!(
            translator(url).generate("chat").await,
            Err(TranslateError::RateLimitExceeded)
        ));

        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let url = respond_with(status, json!({})).await;
            assert!(matches!(
                translator(url).generate("chat").await,
                Err(TranslateError::AuthenticationError)
            ));
        }

        let url = respond_with(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": { "code": 500, "message": "backend unavailable" } }),
        )
        .await;
        match translator(url).generate("chat").await {
            Err(TranslateError::HttpStatus { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "backend unavailable");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_candidates_are_empty_responses() {
        let url = respond_with(StatusCode::OK, json!({ "candidates": [] })).await;
        assert!(matches!(
            translator(url).generate("chat").await,
            Err(TranslateError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let url = serve(Router::new().fallback(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({}))
        }))
        .await;

        let translator = translator(url)
            .with_timeout(Duration::from_millis(100))
            .unwrap();
        assert!(matches!(
            translator.generate("chat").await,
            Err(TranslateError::Timeout)
        ));
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_error() {
        // Bind then drop, so nothing is listening on the port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = translator(format!("http://{addr}/v1beta")).generate("chat").await;
        assert!(matches!(result, Err(TranslateError::NetworkError(_))));
    }

    #[tokio::test]
    async fn configured_timeout_applies() {
        let url = serve(Router::new().fallback(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({}))
        }))
        .await;

        let config = TranslatorConfig {
            api_key: "test-key".to_string(),
            api_url: url,
            timeout_seconds: 1,
            ..TranslatorConfig::default()
        };
        let translator = GeminiTranslator::from_config(&config).unwrap();
        assert!(matches!(
            translator.generate("chat").await,
            Err(TranslateError::Timeout)
        ));
    }
}
