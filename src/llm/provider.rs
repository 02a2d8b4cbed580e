use async_trait::async_trait;
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configuration for an LLM provider
pub struct LLMProviderConfig {
    pub name: String,
    pub api_key: String,
    /// Override of the provider's API root, used for proxies and tests
    pub api_base: Option<String>,
}

pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
    provider_name: String,
}

impl LLM {
    pub fn new(provider: LLMProviderConfig) -> AppResult<Self> {
        let adapter: Box<dyn LLMAdapter> = match provider.name.as_str() {
            "google" | "gemini" => {
                let adapter = match &provider.api_base {
                    Some(base) => crate::llm::google::GoogleAdapter::with_base_url(&provider.api_key, base),
                    None => crate::llm::google::GoogleAdapter::new(&provider.api_key),
                };
                Box::new(adapter)
            }
            other => {
                return Err(AppError::InvalidRequest(format!("Unsupported provider: {}", other)));
            }
        };

        Ok(Self {
            adapter,
            provider_name: provider.name,
        })
    }

    /// Wrap an already constructed adapter
    pub fn from_adapter(name: impl Into<String>, adapter: Box<dyn LLMAdapter>) -> Self {
        Self {
            adapter,
            provider_name: name.into(),
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_is_rejected() {
        let result = LLM::new(LLMProviderConfig {
            name: "openai".to_string(),
            api_key: "key".to_string(),
            api_base: None,
        });
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_gemini_alias() {
        let llm = LLM::new(LLMProviderConfig {
            name: "gemini".to_string(),
            api_key: "key".to_string(),
            api_base: None,
        })
        .unwrap();
        assert_eq!(llm.provider_name(), "gemini");
    }
}
