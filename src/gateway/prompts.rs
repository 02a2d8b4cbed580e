// Prompts and response schemas sent to the generative data source

use serde_json::{json, Value};

use crate::catalog::RnaCategory;

pub const SYSTEM_INSTRUCTION: &str =
    "You act as a specialized bioinformatics database for glycosylated RNAs (glycoRNAs) \
     backed by TCGA cohorts. Answer only with JSON that matches the requested schema.";

pub fn expression_prompt(tumor_code: &str, category: RnaCategory) -> String {
    format!(
        "The user is querying for '{category}' in the TCGA tumor type '{tumor_code}'.\n\
         Generate a realistic dataset of 10 specific RNA transcripts that are known or highly \
         predicted to be glycoRNAs.\n\
         For each entry provide: geneId, symbol, category, tumorExpression and normalExpression \
         (Log2 CPM), foldChange, pValue, fdr, evidence (brief mechanism) and localization.\n\
         Return only a JSON array."
    )
}

pub fn detailed_analysis_prompt(symbol: &str, tumor_code: &str) -> String {
    format!(
        "Perform a comprehensive multi-omics analysis for the glycoRNA '{symbol}' in TCGA-{tumor_code}.\n\
         Generate a JSON object containing:\n\
         1. survival: Kaplan-Meier points (time in months, survivalProb, group) and 15 patient \
            samples with TCGA barcodes. The 'group' field of each point must be exactly \
            \"High Expression\" or \"Low Expression\"; sample status is LIVING or DECEASED.\n\
         2. clinical: expression differences by 'Pathologic Stage' (Stage I-IV) and 'Gender', \
            with average expression per group and a p-value.\n\
         3. enrichment: top 5 GO terms (GO_BP, GO_CC, GO_MF) and KEGG pathways correlated with this gene.\n\
         4. immune: Spearman correlation with 6 key immune cell types.\n\
         5. drugs: top 5 drugs whose IC50 correlates with expression of this gene.\n\
         Return only JSON."
    )
}

pub fn expression_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "geneId": { "type": "STRING" },
                "symbol": { "type": "STRING" },
                "category": { "type": "STRING" },
                "tumorExpression": { "type": "NUMBER" },
                "normalExpression": { "type": "NUMBER" },
                "foldChange": { "type": "NUMBER" },
                "pValue": { "type": "NUMBER" },
                "fdr": { "type": "NUMBER" },
                "evidence": { "type": "STRING" },
                "localization": { "type": "STRING" }
            },
            "required": [
                "geneId", "symbol", "category", "tumorExpression", "normalExpression",
                "foldChange", "pValue", "fdr", "evidence", "localization"
            ]
        }
    })
}

pub fn detailed_analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "geneSymbol": { "type": "STRING" },
            "tumorType": { "type": "STRING" },
            "survival": {
                "type": "OBJECT",
                "properties": {
                    "pValLogRank": { "type": "NUMBER" },
                    "hazardRatio": { "type": "NUMBER" },
                    "interpretation": { "type": "STRING" },
                    "data": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "time": { "type": "NUMBER" },
                                "survivalProb": { "type": "NUMBER" },
                                "group": { "type": "STRING", "enum": ["High Expression", "Low Expression"] }
                            },
                            "required": ["time", "survivalProb", "group"]
                        }
                    },
                    "samples": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "sampleId": { "type": "STRING" },
                                "expressionLevel": { "type": "NUMBER" },
                                "group": { "type": "STRING" },
                                "survivalMonths": { "type": "NUMBER" },
                                "status": { "type": "STRING", "enum": ["LIVING", "DECEASED"] }
                            },
                            "required": ["sampleId", "expressionLevel", "group", "survivalMonths", "status"]
                        }
                    }
                },
                "required": ["pValLogRank", "hazardRatio", "interpretation", "data", "samples"]
            },
            "clinical": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "featureName": { "type": "STRING" },
                        "pValue": { "type": "NUMBER" },
                        "groups": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "name": { "type": "STRING" },
                                    "averageExpression": { "type": "NUMBER" },
                                    "count": { "type": "INTEGER" }
                                },
                                "required": ["name", "averageExpression", "count"]
                            }
                        }
                    },
                    "required": ["featureName", "pValue", "groups"]
                }
            },
            "enrichment": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "term": { "type": "STRING" },
                        "category": { "type": "STRING", "enum": ["GO_BP", "GO_CC", "GO_MF", "KEGG"] },
                        "pValue": { "type": "NUMBER" },
                        "count": { "type": "INTEGER" },
                        "geneRatio": { "type": "NUMBER" }
                    },
                    "required": ["id", "term", "category", "pValue", "count", "geneRatio"]
                }
            },
            "immune": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "cellType": { "type": "STRING" },
                        "correlation": { "type": "NUMBER" },
                        "pValue": { "type": "NUMBER" }
                    },
                    "required": ["cellType", "correlation", "pValue"]
                }
            },
            "drugs": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "drugName": { "type": "STRING" },
                        "correlation": { "type": "NUMBER" },
                        "mechanism": { "type": "STRING" },
                        "pValue": { "type": "NUMBER" }
                    },
                    "required": ["drugName", "correlation", "mechanism", "pValue"]
                }
            }
        },
        "required": ["geneSymbol", "tumorType", "survival", "clinical", "enrichment", "immune", "drugs"]
    })
}
