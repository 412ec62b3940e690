use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Upstream model configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Vertex AI backend
    #[serde(default)]
    pub vertex: VertexConfig,
    /// Context budget applied to inbound conversations
    #[serde(default)]
    pub context: ContextConfig,
    /// Fail non-streaming requests on unrecognized upstream chunks instead
    /// of treating them as empty text
    #[serde(default)]
    pub strict_aggregation: bool,
}

/// Vertex AI backend configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VertexConfig {
    /// Google Cloud project ID
    pub project_id: String,
    /// Google Cloud region
    #[serde(default = "default_region")]
    pub region: String,
    /// Publisher model name
    #[serde(default = "default_model")]
    pub model: String,
    /// OAuth access token sent as a bearer credential
    #[serde(default)]
    pub access_token: Option<SecretString>,
    /// Base URL override, e.g. `https://us-central1-aiplatform.googleapis.com/v1`
    #[serde(default)]
    pub base_url: Option<Url>,
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            region: default_region(),
            model: default_model(),
            access_token: None,
            base_url: None,
        }
    }
}

/// Context window budgets, in estimated tokens
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    /// Hard budget; oldest messages are evicted beyond it
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Soft budget; crossing it only logs a warning
    #[serde(default = "default_preferred_size")]
    pub preferred_size: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            preferred_size: default_preferred_size(),
        }
    }
}

fn default_region() -> String {
    "us-central1".to_string()
}

fn default_model() -> String {
    "gemini-2.5-pro-preview-03-25".to_string()
}

const fn default_max_size() -> usize {
    1_000_000
}

const fn default_preferred_size() -> usize {
    200_000
}
