//! Centralized server configuration.
//!
//! Loaded via the `config` crate from environment variables. Field names
//! match the lower-cased variable names (`VERIFY_TOKEN` -> `verify_token`).
//! Every field has a default so the server starts with an empty
//! environment; missing credentials disable the features that need them.

use pagechat_ai::OpenAiConfig;
use pagechat_messenger::GraphSendConfig;
use pagechat_responder::ResponderKind;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Server configuration.
#[derive(Clone, Deserialize)]
pub struct ServerConfig {
    /// Token echoed back during webhook registration.
    #[serde(default = "default_verify_token")]
    pub verify_token: String,

    /// Page access token for the Send API.
    #[serde(default)]
    pub page_access_token: Option<String>,

    /// App secret for webhook signatures.
    #[serde(default)]
    pub app_secret: Option<String>,

    /// OpenAI API key.
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// OpenAI-compatible API base URL.
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Chat model name.
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Reply strategy.
    #[serde(default)]
    pub responder: ResponderKind,

    /// Name reported by the health endpoint.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Raises the default log level to debug.
    #[serde(default)]
    pub debug: bool,

    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Graph API host.
    #[serde(default = "default_graph_api_base_url")]
    pub graph_api_base_url: String,

    /// Graph API version.
    #[serde(default = "default_graph_api_version")]
    pub graph_api_version: String,

    /// Timeout for outbound HTTP calls, in seconds.
    #[serde(default = "default_http_timeout_seconds")]
    pub http_timeout_seconds: u64,
}

fn default_verify_token() -> String {
    "your_verify_token_here".to_string()
}

fn default_openai_base_url() -> String {
    pagechat_ai::openai::DEFAULT_BASE_URL.to_string()
}

fn default_openai_model() -> String {
    pagechat_ai::openai::DEFAULT_MODEL.to_string()
}

fn default_app_name() -> String {
    "Messenger Chatbot".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_graph_api_base_url() -> String {
    pagechat_messenger::send::DEFAULT_GRAPH_BASE_URL.to_string()
}

fn default_graph_api_version() -> String {
    pagechat_messenger::send::DEFAULT_GRAPH_API_VERSION.to_string()
}

fn default_http_timeout_seconds() -> u64 {
    30
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the `host:port` pair to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the outbound HTTP timeout.
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    /// Builds the Send API client settings.
    #[must_use]
    pub fn send_config(&self) -> GraphSendConfig {
        GraphSendConfig::new(self.page_access_token.clone())
            .with_base_url(&self.graph_api_base_url)
            .with_api_version(&self.graph_api_version)
            .with_timeout(self.http_timeout())
    }

    /// Builds the language-model client settings.
    #[must_use]
    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig::new(self.openai_api_key.clone())
            .with_base_url(&self.openai_base_url)
            .with_model(&self.openai_model)
            .with_timeout(self.http_timeout())
    }
}

fn redact(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "<redacted>")
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("verify_token", &"<redacted>")
            .field("page_access_token", &redact(&self.page_access_token))
            .field("app_secret", &redact(&self.app_secret))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("responder", &self.responder)
            .field("app_name", &self.app_name)
            .field("debug", &self.debug)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("graph_api_base_url", &self.graph_api_base_url)
            .field("graph_api_version", &self.graph_api_version)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .finish()
    }
}
