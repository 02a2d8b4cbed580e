use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{RnaCategory, TumorType};
use crate::config::Config;
use crate::dashboard::Dashboard;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub dashboard: Arc<Dashboard>,
}

// Records returned by the data source. Field names follow the camelCase JSON
// the generative source produces and the frontend consumes.

/// One candidate transcript from a list-level expression search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionRecord {
    pub gene_id: String,
    pub symbol: String,
    pub category: RnaCategory,
    /// Log2 CPM
    pub tumor_expression: f64,
    /// Log2 CPM
    pub normal_expression: f64,
    pub fold_change: f64,
    pub p_value: f64,
    pub fdr: f64,
    pub evidence: String,
    pub localization: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalPoint {
    pub time: f64,
    pub survival_prob: f64,
    /// Raw label as produced upstream, e.g. "High Expression" or "High"
    pub group: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VitalStatus {
    #[serde(rename = "LIVING")]
    Alive,
    #[serde(rename = "DECEASED")]
    Deceased,
}

impl VitalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalStatus::Alive => "LIVING",
            VitalStatus::Deceased => "DECEASED",
        }
    }
}

impl FromStr for VitalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LIVING" | "ALIVE" => Ok(VitalStatus::Alive),
            "DECEASED" | "DEAD" => Ok(VitalStatus::Deceased),
            other => Err(format!("unknown vital status: {:?}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for VitalStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalSample {
    pub sample_id: String,
    pub expression_level: f64,
    pub group: String,
    pub survival_months: f64,
    pub status: VitalStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalAnalysis {
    pub p_val_log_rank: f64,
    pub hazard_ratio: f64,
    #[serde(default)]
    pub interpretation: String,
    #[serde(default)]
    pub data: Vec<SurvivalPoint>,
    #[serde(default)]
    pub samples: Vec<ClinicalSample>,
}

/// First rows of the sample table plus how many were left out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplePreview {
    pub rows: Vec<ClinicalSample>,
    pub remaining: usize,
}

impl SurvivalAnalysis {
    pub fn sample_preview(&self, limit: usize) -> SamplePreview {
        let shown = self.samples.len().min(limit);
        SamplePreview {
            rows: self.samples[..shown].to_vec(),
            remaining: self.samples.len() - shown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalGroup {
    pub name: String,
    pub average_expression: f64,
    pub count: u32,
}

/// Expression difference across the levels of one clinical variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalFeature {
    pub feature_name: String,
    #[serde(default)]
    pub groups: Vec<ClinicalGroup>,
    pub p_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrichmentCategory {
    #[serde(rename = "GO_BP")]
    GoBiologicalProcess,
    #[serde(rename = "GO_CC")]
    GoCellularComponent,
    #[serde(rename = "GO_MF")]
    GoMolecularFunction,
    #[serde(rename = "KEGG")]
    Kegg,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentTerm {
    pub id: String,
    pub term: String,
    pub category: EnrichmentCategory,
    pub p_value: f64,
    pub count: u32,
    /// 0-1
    pub gene_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmuneCell {
    pub cell_type: String,
    /// Spearman rho, -1 to 1
    pub correlation: f64,
    pub p_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugSensitivity {
    pub drug_name: String,
    /// Correlation with IC50; negative means higher expression, more sensitive
    pub correlation: f64,
    pub mechanism: String,
    pub p_value: f64,
}

/// Multi-panel report for one gene in one tumor type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysisResult {
    pub gene_symbol: String,
    pub tumor_type: String,
    pub survival: SurvivalAnalysis,
    #[serde(default)]
    pub clinical: Vec<ClinicalFeature>,
    #[serde(default)]
    pub enrichment: Vec<EnrichmentTerm>,
    #[serde(default)]
    pub immune: Vec<ImmuneCell>,
    #[serde(default)]
    pub drugs: Vec<DrugSensitivity>,
}

impl DetailedAnalysisResult {
    /// The pathologic stage breakdown, when the report has one
    pub fn stage_feature(&self) -> Option<&ClinicalFeature> {
        self.clinical.iter().find(|c| c.feature_name.contains("Stage"))
    }
}

// API Request/Response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub tumor_code: String,
    pub rna_category: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub symbol: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub tumor_types: &'static [TumorType],
    pub rna_categories: Vec<RnaCategory>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str) -> ClinicalSample {
        ClinicalSample {
            sample_id: id.to_string(),
            expression_level: 1.0,
            group: "High".to_string(),
            survival_months: 12.0,
            status: VitalStatus::Alive,
        }
    }

    #[test]
    fn test_vital_status_is_lenient() {
        let statuses: Vec<VitalStatus> =
            serde_json::from_str(r#"["LIVING", "Alive", "deceased", "Dead"]"#).unwrap();
        assert_eq!(
            statuses,
            vec![VitalStatus::Alive, VitalStatus::Alive, VitalStatus::Deceased, VitalStatus::Deceased]
        );
        assert!(serde_json::from_str::<VitalStatus>("\"unknown\"").is_err());
        assert_eq!(serde_json::to_string(&VitalStatus::Deceased).unwrap(), "\"DECEASED\"");
    }

    #[test]
    fn test_unknown_enrichment_category() {
        let term: EnrichmentTerm = serde_json::from_str(
            r#"{"id":"R-HSA-1","term":"Glycosylation","category":"Reactome","pValue":0.01,"count":4,"geneRatio":0.2}"#,
        )
        .unwrap();
        assert_eq!(term.category, EnrichmentCategory::Other);
    }

    #[test]
    fn test_detailed_result_defaults_missing_panels() {
        let json = r#"{
            "geneSymbol": "RNU2-1",
            "tumorType": "LUAD",
            "survival": {"pValLogRank": 0.003, "hazardRatio": 1.8}
        }"#;
        let result: DetailedAnalysisResult = serde_json::from_str(json).unwrap();
        assert!(result.survival.data.is_empty());
        assert!(result.clinical.is_empty());
        assert!(result.drugs.is_empty());
        assert!(result.stage_feature().is_none());
    }

    #[test]
    fn test_stage_feature_lookup() {
        let feature = |name: &str| ClinicalFeature {
            feature_name: name.to_string(),
            groups: vec![],
            p_value: 0.04,
        };
        let result = DetailedAnalysisResult {
            gene_symbol: "RNY1".to_string(),
            tumor_type: "BRCA".to_string(),
            survival: SurvivalAnalysis {
                p_val_log_rank: 0.1,
                hazard_ratio: 1.1,
                interpretation: String::new(),
                data: vec![],
                samples: vec![],
            },
            clinical: vec![feature("Gender"), feature("Pathologic Stage")],
            enrichment: vec![],
            immune: vec![],
            drugs: vec![],
        };
        assert_eq!(result.stage_feature().unwrap().feature_name, "Pathologic Stage");
    }

    #[test]
    fn test_sample_preview() {
        let analysis = SurvivalAnalysis {
            p_val_log_rank: 0.2,
            hazard_ratio: 0.9,
            interpretation: String::new(),
            data: vec![],
            samples: (0..7).map(|i| sample(&format!("TCGA-{}", i))).collect(),
        };
        let preview = analysis.sample_preview(5);
        assert_eq!(preview.rows.len(), 5);
        assert_eq!(preview.remaining, 2);

        let all = analysis.sample_preview(10);
        assert_eq!(all.rows.len(), 7);
        assert_eq!(all.remaining, 0);
    }
}
