//! Data Source Gateway
//!
//! The dashboard never computes biological data itself. It asks a
//! [`DataGateway`] for a candidate list or for one gene's report and treats
//! the answer as an opaque, possibly slow, possibly failing remote call.
//!
//! Every failure, whether transport, decoding or upstream rejection, is
//! reported as [`AppError::DataUnavailable`].

pub mod prompts;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::catalog::RnaCategory;
use crate::config::LLMConfig;
use crate::llm::{LLMProviderConfig, LLM};
use crate::models::{DetailedAnalysisResult, ExpressionRecord};
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest};

#[async_trait]
pub trait DataGateway: Send + Sync {
    async fn fetch_expression(
        &self,
        tumor_code: &str,
        category: RnaCategory,
    ) -> AppResult<Vec<ExpressionRecord>>;

    async fn fetch_detailed_analysis(
        &self,
        symbol: &str,
        tumor_code: &str,
    ) -> AppResult<DetailedAnalysisResult>;
}

/// Gateway backed by a generative model with structured JSON output
pub struct GenerativeGateway {
    llm: LLM,
    model: String,
    temperature: f32,
}

/// Expression row as the model emits it. The category is free text and is
/// not trusted.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpressionRow {
    gene_id: String,
    symbol: String,
    #[serde(default)]
    category: Option<String>,
    tumor_expression: f64,
    normal_expression: f64,
    fold_change: f64,
    p_value: f64,
    fdr: f64,
    #[serde(default)]
    evidence: String,
    #[serde(default)]
    localization: String,
}

impl ExpressionRow {
    fn into_record(self, requested: RnaCategory) -> ExpressionRecord {
        let category = self
            .category
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or(requested);
        ExpressionRecord {
            gene_id: self.gene_id,
            symbol: self.symbol,
            category,
            tumor_expression: self.tumor_expression,
            normal_expression: self.normal_expression,
            fold_change: self.fold_change,
            p_value: self.p_value,
            fdr: self.fdr,
            evidence: self.evidence,
            localization: self.localization,
        }
    }
}

impl GenerativeGateway {
    pub fn new(llm: LLM, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature,
        }
    }

    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        let llm = LLM::new(LLMProviderConfig {
            name: config.provider.clone(),
            api_key: config.google_api_key.clone(),
            api_base: Some(config.api_base.clone()),
        })?;
        Ok(Self::new(llm, config.model.clone(), config.temperature))
    }

    async fn generate(&self, prompt: String, schema: serde_json::Value) -> AppResult<String> {
        let request = LLMRequest {
            model: self.model.clone(),
            messages: vec![LLMMessage::user(prompt)],
            max_tokens: None,
            temperature: Some(self.temperature),
            system_instruction: Some(prompts::SYSTEM_INSTRUCTION.to_string()),
            response_schema: Some(schema),
        };

        let response = self
            .llm
            .create_chat_completion(&request)
            .await
            .map_err(|e| AppError::DataUnavailable(e.to_string()))?;

        debug!(
            provider = self.llm.provider_name(),
            total_tokens = response.usage.total_tokens,
            "Generative source answered"
        );
        Ok(response.content)
    }
}

/// Strip a Markdown code fence some models wrap around JSON answers
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

fn decode<T: serde::de::DeserializeOwned>(text: &str) -> AppResult<T> {
    serde_json::from_str(strip_code_fence(text))
        .map_err(|e| AppError::DataUnavailable(format!("malformed response: {}", e)))
}

#[async_trait]
impl DataGateway for GenerativeGateway {
    async fn fetch_expression(
        &self,
        tumor_code: &str,
        category: RnaCategory,
    ) -> AppResult<Vec<ExpressionRecord>> {
        info!(tumor = %tumor_code, category = %category, "Fetching expression candidates");

        let text = self
            .generate(
                prompts::expression_prompt(tumor_code, category),
                prompts::expression_schema(),
            )
            .await?;
        let rows: Vec<ExpressionRow> = decode(&text)?;

        Ok(rows.into_iter().map(|row| row.into_record(category)).collect())
    }

    async fn fetch_detailed_analysis(
        &self,
        symbol: &str,
        tumor_code: &str,
    ) -> AppResult<DetailedAnalysisResult> {
        info!(symbol = %symbol, tumor = %tumor_code, "Fetching detailed analysis");

        let text = self
            .generate(
                prompts::detailed_analysis_prompt(symbol, tumor_code),
                prompts::detailed_analysis_schema(),
            )
            .await?;
        decode(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMAdapter;
    use crate::types::{LLMResponse, TokenUsage};
    use std::sync::{Arc, Mutex};

    /// Adapter that answers every request with a canned body
    struct CannedAdapter {
        answer: AppResult<String>,
        seen: Arc<Mutex<Vec<LLMRequest>>>,
    }

    #[async_trait]
    impl LLMAdapter for CannedAdapter {
        async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<crate::types::LLMResponse> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.answer {
                Ok(content) => Ok(LLMResponse {
                    content: content.clone(),
                    finish_reason: "STOP".to_string(),
                    usage: TokenUsage::default(),
                }),
                Err(e) => Err(AppError::LLMApi(e.to_string())),
            }
        }
    }

    fn gateway(answer: AppResult<String>) -> (GenerativeGateway, Arc<Mutex<Vec<LLMRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let adapter = CannedAdapter { answer, seen: seen.clone() };
        let llm = LLM::from_adapter("canned", Box::new(adapter));
        (GenerativeGateway::new(llm, "gemini-2.5-flash", 0.4), seen)
    }

    const ROWS: &str = r#"[
        {"geneId": "ENSG00000207015", "symbol": "RNY1", "category": "Y RNA",
         "tumorExpression": 8.2, "normalExpression": 5.1, "foldChange": 3.1,
         "pValue": 1.2e-6, "fdr": 3.4e-5, "evidence": "Sialylated", "localization": "Cell surface"},
        {"geneId": "ENSG00000201098", "symbol": "RNY3", "category": "snRNA",
         "tumorExpression": 6.0, "normalExpression": 6.4, "foldChange": -0.4,
         "pValue": 0.2, "fdr": 0.4, "evidence": "Predicted", "localization": "Membrane"}
    ]"#;

    #[tokio::test]
    async fn test_fetch_expression_decodes_rows() {
        let (gateway, seen) = gateway(Ok(ROWS.to_string()));
        let records = gateway.fetch_expression("BRCA", RnaCategory::YRna).await.unwrap();

        assert_eq!(records.len(), 2);
        // unparseable category falls back to the requested one
        assert_eq!(records[0].category, RnaCategory::YRna);
        assert_eq!(records[1].category, RnaCategory::SnRna);
        assert_eq!(records[0].symbol, "RNY1");

        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].messages[0].content.contains("BRCA"));
        assert_eq!(requests[0].response_schema.as_ref().unwrap()["type"], "ARRAY");
    }

    #[tokio::test]
    async fn test_fenced_json_is_accepted() {
        let (gateway, _) = gateway(Ok(format!("```json\n{}\n```", ROWS)));
        let records = gateway.fetch_expression("BRCA", RnaCategory::YRna).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_data_unavailable() {
        let (gateway, _) = gateway(Ok("{\"not\": \"an array\"}".to_string()));
        let err = gateway.fetch_expression("ACC", RnaCategory::TRna).await.unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_data_unavailable() {
        let (gateway, _) = gateway(Err(AppError::LLMApi("timeout".to_string())));
        let err = gateway.fetch_detailed_analysis("RNY1", "ACC").await.unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_detailed_analysis() {
        let body = r#"{
            "geneSymbol": "RNY1",
            "tumorType": "BRCA",
            "survival": {
                "pValLogRank": 0.004, "hazardRatio": 1.9, "interpretation": "Worse outcome",
                "data": [{"time": 0, "survivalProb": 1.0, "group": "High Expression"}],
                "samples": [{"sampleId": "TCGA-A1-0001", "expressionLevel": 7.5,
                             "group": "High", "survivalMonths": 22.4, "status": "DECEASED"}]
            },
            "clinical": [], "enrichment": [], "immune": [], "drugs": []
        }"#;
        let (gateway, seen) = gateway(Ok(body.to_string()));
        let result = gateway.fetch_detailed_analysis("RNY1", "BRCA").await.unwrap();

        assert_eq!(result.gene_symbol, "RNY1");
        assert_eq!(result.survival.samples.len(), 1);
        assert!(seen.lock().unwrap()[0].messages[0].content.contains("TCGA-BRCA"));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  [2] "), "[2]");
    }
}
