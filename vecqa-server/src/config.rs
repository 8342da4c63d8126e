//! Process configuration, read once from the environment at startup.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use vecqa_pinecone::Metric;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        let app_env = env_or_default("APP_ENV", "development");
        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Configuration that can be loaded from environment variables.
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_required(key: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(key.to_string())),
    }
}

/// Parses `key` when set, otherwise parses `default`.
pub fn env_parse<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    env_or_default(key, default)
        .trim()
        .parse()
        .map_err(|err: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: err.to_string(),
        })
}

/// Boolean switch: `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`, any case.
pub fn env_flag(key: &str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = env_optional(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::ParseError {
            key: key.to_string(),
            details: format!("expected a boolean, got '{raw}'"),
        }),
    }
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Clone)]
pub struct OpenAiSettings {
    pub api_key: SecretString,
    pub base_url: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub completion_model: String,
    pub temperature: f32,
    pub answer_generation: bool,
}

impl fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("embedding_model", &self.embedding_model)
            .field("embedding_dimension", &self.embedding_dimension)
            .field("completion_model", &self.completion_model)
            .field("temperature", &self.temperature)
            .field("answer_generation", &self.answer_generation)
            .finish()
    }
}

impl FromEnv for OpenAiSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let embedding_dimension: usize = env_parse("EMBEDDING_DIMENSION", "1536")?;
        if embedding_dimension == 0 {
            return Err(ConfigError::Invalid(
                "EMBEDDING_DIMENSION must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            api_key: SecretString::new(env_required("OPENAI_API_KEY")?),
            base_url: env_or_default("OPENAI_BASE_URL", vecqa_llm::OPENAI_BASE_URL),
            embedding_model: env_or_default("EMBEDDING_MODEL", "text-embedding-3-small"),
            embedding_dimension,
            completion_model: env_or_default("COMPLETION_MODEL", "gpt-3.5-turbo"),
            temperature: env_parse("COMPLETION_TEMPERATURE", "0.3")?,
            answer_generation: env_flag("ANSWER_GENERATION", true)?,
        })
    }
}

#[derive(Clone)]
pub struct PineconeSettings {
    pub api_key: SecretString,
    pub index_name: String,
    pub namespace: String,
    pub index_host: Option<String>,
    pub control_url: String,
    pub metric: Metric,
}

impl fmt::Debug for PineconeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PineconeSettings")
            .field("api_key", &"<redacted>")
            .field("index_name", &self.index_name)
            .field("namespace", &self.namespace)
            .field("index_host", &self.index_host)
            .field("control_url", &self.control_url)
            .field("metric", &self.metric)
            .finish()
    }
}

impl FromEnv for PineconeSettings {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: SecretString::new(env_required("PINECONE_API_KEY")?),
            index_name: env_or_default("PINECONE_INDEX", "receptional"),
            namespace: env_or_default("PINECONE_NAMESPACE", "ns1"),
            index_host: env_optional("PINECONE_INDEX_HOST"),
            control_url: env_or_default("PINECONE_CONTROL_URL", vecqa_pinecone::DEFAULT_CONTROL_URL),
            metric: env_parse("PINECONE_METRIC", "cosine")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuerySettings {
    pub default_top_k: usize,
    pub max_top_k: usize,
    pub upstream_timeout: Duration,
}

/// Extra time the HTTP clients get beyond the pipeline deadline.
const HTTP_TIMEOUT_GRACE: Duration = Duration::from_secs(5);

impl QuerySettings {
    /// Deadline for the underlying HTTP clients. It outlasts
    /// `upstream_timeout` so an expiry always surfaces as a pipeline timeout
    /// rather than a transport error.
    pub fn http_timeout(&self) -> Duration {
        self.upstream_timeout + HTTP_TIMEOUT_GRACE
    }
}

impl FromEnv for QuerySettings {
    fn from_env() -> Result<Self, ConfigError> {
        let default_top_k: usize = env_parse("TOP_K_DEFAULT", "3")?;
        let max_top_k: usize = env_parse("TOP_K_MAX", "20")?;
        let timeout_secs: u64 = env_parse("UPSTREAM_TIMEOUT_SECS", "30")?;

        if max_top_k == 0 {
            return Err(ConfigError::Invalid("TOP_K_MAX must be at least 1".to_string()));
        }
        if default_top_k == 0 || default_top_k > max_top_k {
            return Err(ConfigError::Invalid(format!(
                "TOP_K_DEFAULT must be between 1 and {max_top_k}"
            )));
        }
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "UPSTREAM_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            default_top_k,
            max_top_k,
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerSettings {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or_default("HOST", "0.0.0.0"),
            port: env_parse("PORT", "8000")?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub openai: OpenAiSettings,
    pub pinecone: PineconeSettings,
    pub query: QuerySettings,
    /// Bearer secret guarding `/vector_client` and the tool routes.
    pub auth_secret: SecretString,
}

impl FromEnv for Settings {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: Environment::from_env(),
            server: ServerSettings::from_env()?,
            openai: OpenAiSettings::from_env()?,
            pinecone: PineconeSettings::from_env()?,
            query: QuerySettings::from_env()?,
            auth_secret: SecretString::new(env_or_default("AUTH_API", "")),
        })
    }
}
