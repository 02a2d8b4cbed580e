//! Fixed selection catalogs
//!
//! The dashboard only accepts tumor codes from the TCGA projects listed here
//! and RNA categories from [`RnaCategory`]. Both lists are exposed to the
//! frontend through `/api/catalog`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TumorType {
    pub code: &'static str,
    pub name: &'static str,
}

pub const TUMOR_TYPES: &[TumorType] = &[
    TumorType { code: "ACC", name: "Adrenocortical Carcinoma" },
    TumorType { code: "BLCA", name: "Bladder Urothelial Carcinoma" },
    TumorType { code: "BRCA", name: "Breast Invasive Carcinoma" },
    TumorType { code: "CESC", name: "Cervical Squamous Cell Carcinoma" },
    TumorType { code: "CHOL", name: "Cholangiocarcinoma" },
    TumorType { code: "COAD", name: "Colon Adenocarcinoma" },
    TumorType { code: "ESCA", name: "Esophageal Carcinoma" },
    TumorType { code: "GBM", name: "Glioblastoma Multiforme" },
    TumorType { code: "HNSC", name: "Head and Neck Squamous Cell Carcinoma" },
    TumorType { code: "KICH", name: "Kidney Chromophobe" },
    TumorType { code: "KIRC", name: "Kidney Renal Clear Cell Carcinoma" },
    TumorType { code: "KIRP", name: "Kidney Renal Papillary Cell Carcinoma" },
    TumorType { code: "LGG", name: "Brain Lower Grade Glioma" },
    TumorType { code: "LIHC", name: "Liver Hepatocellular Carcinoma" },
    TumorType { code: "LUAD", name: "Lung Adenocarcinoma" },
    TumorType { code: "LUSC", name: "Lung Squamous Cell Carcinoma" },
    TumorType { code: "OV", name: "Ovarian Serous Cystadenocarcinoma" },
    TumorType { code: "PAAD", name: "Pancreatic Adenocarcinoma" },
    TumorType { code: "PRAD", name: "Prostate Adenocarcinoma" },
    TumorType { code: "READ", name: "Rectum Adenocarcinoma" },
    TumorType { code: "SKCM", name: "Skin Cutaneous Melanoma" },
    TumorType { code: "STAD", name: "Stomach Adenocarcinoma" },
    TumorType { code: "THCA", name: "Thyroid Carcinoma" },
    TumorType { code: "UCEC", name: "Uterine Corpus Endometrial Carcinoma" },
];

/// Look up a tumor type by its exact TCGA code
pub fn find_tumor(code: &str) -> Option<&'static TumorType> {
    TUMOR_TYPES.iter().find(|t| t.code == code)
}

/// RNA categories that can carry glycans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RnaCategory {
    #[serde(rename = "tRNA")]
    TRna,
    #[serde(rename = "YRNA")]
    YRna,
    #[serde(rename = "snRNA")]
    SnRna,
    #[serde(rename = "rRNA")]
    RRna,
    #[serde(rename = "snoRNA")]
    SnoRna,
}

impl RnaCategory {
    pub const ALL: [RnaCategory; 5] = [
        RnaCategory::TRna,
        RnaCategory::YRna,
        RnaCategory::SnRna,
        RnaCategory::RRna,
        RnaCategory::SnoRna,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RnaCategory::TRna => "tRNA",
            RnaCategory::YRna => "YRNA",
            RnaCategory::SnRna => "snRNA",
            RnaCategory::RRna => "rRNA",
            RnaCategory::SnoRna => "snoRNA",
        }
    }
}

impl std::fmt::Display for RnaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RnaCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RnaCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::InvalidRequest(format!("unknown RNA category: {:?}", s)))
    }
}
