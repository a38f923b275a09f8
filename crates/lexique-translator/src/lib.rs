pub mod normalize;

pub use normalize::{
    LenientNormalizer, NormalizeError, ParsedEntry, ResponseNormalizer, StrictNormalizer,
    normalizer_for,
};

/// Generative model interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Send a prompt and return the model's raw text
    async fn generate(&self, prompt: &str) -> Result<String, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub model: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API key is not configured")]
    MissingCredential,

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("API returned no text")]
    EmptyResponse,

    #[error("API error: {0}")]
    ApiError(String),
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslateError::Timeout
        } else {
            TranslateError::NetworkError(e)
        }
    }
}
