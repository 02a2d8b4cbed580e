use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    /// Directory holding the built frontend
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: String,
    pub google_api_key: String,
    pub model: String,
    pub api_base: String,
    pub temperature: f32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server: ServerConfig {
                port: var("PORT")
                    .unwrap_or_else(|| "3000".to_string())
                    .parse()?,
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                cors_allowed_origins: var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|| "http://localhost:3000,http://localhost:5173".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                static_dir: var("STATIC_DIR").unwrap_or_else(|| "dashboard/dist".to_string()),
            },
            llm: LLMConfig {
                provider: var("LLM_PROVIDER").unwrap_or_else(|| "google".to_string()),
                google_api_key: var("GEMINI_API_KEY")
                    .or_else(|| var("GOOGLE_API_KEY"))
                    .unwrap_or_default(),
                model: var("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.5-flash".to_string()),
                api_base: var("GEMINI_API_BASE")
                    .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string()),
                temperature: var("GEMINI_TEMPERATURE")
                    .unwrap_or_else(|| "0.4".to_string())
                    .parse()?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(lookup(&[])).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.cors_allowed_origins.len(), 2);
        assert_eq!(config.llm.provider, "google");
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert!(config.llm.google_api_key.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(lookup(&[
            ("PORT", "8080"),
            ("ALLOWED_ORIGINS", "https://atlas.example.org, ,"),
            ("GOOGLE_API_KEY", "fallback-key"),
            ("GEMINI_TEMPERATURE", "0.9"),
        ]))
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors_allowed_origins, vec!["https://atlas.example.org"]);
        assert_eq!(config.llm.google_api_key, "fallback-key");
        assert!((config.llm.temperature - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_gemini_key_preferred() {
        let config = Config::from_vars(lookup(&[
            ("GEMINI_API_KEY", "primary"),
            ("GOOGLE_API_KEY", "fallback"),
        ]))
        .unwrap();
        assert_eq!(config.llm.google_api_key, "primary");
    }

    #[test]
    fn test_invalid_port() {
        assert!(Config::from_vars(lookup(&[("PORT", "not-a-port")])).is_err());
    }
}
