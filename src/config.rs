//! Analyzer configuration

/// Default model used for analysis.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default Gemini REST API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Settings for reaching the remote model.
#[derive(Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Credential for the remote service
    pub api_key: Option<String>,
    /// Model identifier (e.g. "gemini-3-flash-preview")
    pub model: String,
    /// API root, without a trailing `/models/...`
    pub base_url: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

// Keeps the credential out of logs.
impl std::fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AnalyzerConfig {
    /// Read settings from the environment.
    ///
    /// `GEMINI_API_KEY` (falling back to `API_KEY`), `GEMINI_MODEL` and
    /// `GEMINI_BASE_URL`. Unset or empty variables keep the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            model: non_empty("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: non_empty("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
