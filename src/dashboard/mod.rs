//! Dashboard controller
//!
//! Sequences the user flow: search a tumor type for candidates, select one
//! candidate, load its deep report. Owns the two request slots and derives
//! the render-ready view from them.
//!
//! State sits behind a `tokio::sync::RwLock` that is only ever taken for
//! synchronous sections. Gateway calls run with the lock released, so the
//! search and report slots can be in flight at the same time. Each call holds
//! a [`Ticket`] and its outcome is dropped if a newer call started on the same
//! slot in the meantime.

pub mod state;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::catalog::{find_tumor, RnaCategory, TumorType};
use crate::export::{self, ExportArtifact};
use crate::gateway::DataGateway;
use crate::models::{ClinicalFeature, DetailedAnalysisResult, ExpressionRecord, SamplePreview};
use crate::survival::{align_survival_curve, AlignedSurvivalPoint};
use crate::types::{AppError, AppResult};

pub use state::{RequestState, Resolution, Slot, Status, Ticket};

pub const SEARCH_FAILED: &str = "Failed to retrieve analysis data.";
pub const REPORT_FAILED: &str = "Failed to perform comprehensive analysis.";

/// Rows shown in the report's sample table before "N more"
pub const SAMPLE_PREVIEW_ROWS: usize = 5;

const EVENT_CAPACITY: usize = 16;

/// A validated search request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchQuery {
    pub tumor: &'static TumorType,
    pub category: RnaCategory,
}

impl SearchQuery {
    pub fn parse(tumor_code: &str, rna_category: &str) -> AppResult<Self> {
        let tumor_code = tumor_code.trim();
        if tumor_code.is_empty() {
            return Err(AppError::InvalidRequest("tumor code is required".to_string()));
        }
        let tumor = find_tumor(tumor_code).ok_or_else(|| {
            AppError::InvalidRequest(format!("unknown tumor code: {}", tumor_code))
        })?;
        let category = rna_category.trim().parse()?;
        Ok(Self { tumor, category })
    }
}

/// Candidate list for one (tumor, category) query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub tumor_code: String,
    pub category: RnaCategory,
    pub records: Vec<ExpressionRecord>,
}

/// Post-commit effects for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DashboardEvent {
    /// A deep report just landed; bring it into view
    FocusReport { symbol: String },
}

/// Everything the rendering layer needs, computed from the current slots
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub search: RequestState<SearchResult>,
    pub report: RequestState<DetailedAnalysisResult>,
    pub survival_curve: Option<Vec<AlignedSurvivalPoint>>,
    pub stage_breakdown: Option<ClinicalFeature>,
    pub sample_preview: Option<SamplePreview>,
}

#[derive(Default)]
struct DashboardState {
    search: Slot<SearchResult>,
    report: Slot<DetailedAnalysisResult>,
    active_query: Option<SearchQuery>,
}

pub struct Dashboard {
    gateway: Arc<dyn DataGateway>,
    state: RwLock<DashboardState>,
    events: broadcast::Sender<DashboardEvent>,
}

impl Dashboard {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            gateway,
            state: RwLock::new(DashboardState::default()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Search a tumor type for candidates of one RNA category.
    ///
    /// Invalid input fails before any state change or gateway call. The deep
    /// report is reset to idle in the same step that marks the search as
    /// loading, and any report still in flight is discarded when it resolves.
    pub async fn run_search(&self, tumor_code: &str, rna_category: &str) -> AppResult<Resolution> {
        let query = SearchQuery::parse(tumor_code, rna_category)?;

        let ticket = {
            let mut state = self.state.write().await;
            state.report.reset();
            state.active_query = Some(query);
            state.search.start()
        };
        info!(tumor = %query.tumor.code, category = %query.category, "Search started");

        let outcome = match self
            .gateway
            .fetch_expression(query.tumor.code, query.category)
            .await
        {
            Ok(records) => Ok(SearchResult {
                tumor_code: query.tumor.code.to_string(),
                category: query.category,
                // the gateway's category is not trusted
                records: records
                    .into_iter()
                    .map(|record| ExpressionRecord {
                        category: query.category,
                        ..record
                    })
                    .collect(),
            }),
            Err(e) => {
                warn!(tumor = %query.tumor.code, category = %query.category, error = %e, "Search failed");
                Err(SEARCH_FAILED.to_string())
            }
        };

        let resolution = self.state.write().await.search.complete(ticket, outcome);
        if resolution == Resolution::Stale {
            debug!(tumor = %query.tumor.code, "Discarded superseded search result");
        }
        Ok(resolution)
    }

    /// Load the deep report for one candidate of the active search.
    ///
    /// The symbol is not checked against the candidate list; the gateway
    /// decides whether it exists. The stored report carries the requested
    /// symbol and tumor code, whatever the gateway echoed back. A
    /// `FocusReport` event follows an applied success once the state lock is
    /// released.
    pub async fn select_candidate(&self, symbol: &str) -> AppResult<Resolution> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(AppError::InvalidRequest("symbol is required".to_string()));
        }
        if symbol.chars().any(|c| c.is_control() || c == '"') {
            return Err(AppError::InvalidRequest(format!("invalid symbol: {:?}", symbol)));
        }

        let (ticket, tumor_code) = {
            let mut state = self.state.write().await;
            let query = state.active_query.ok_or_else(|| {
                AppError::InvalidRequest("run a search before selecting a candidate".to_string())
            })?;
            (state.report.start(), query.tumor.code)
        };
        info!(symbol = %symbol, tumor = %tumor_code, "Deep report started");

        let outcome = self
            .gateway
            .fetch_detailed_analysis(symbol, tumor_code)
            .await
            // the report's identity fields are not trusted
            .map(|report| DetailedAnalysisResult {
                gene_symbol: symbol.to_string(),
                tumor_type: tumor_code.to_string(),
                ..report
            })
            .map_err(|e| {
                warn!(symbol = %symbol, tumor = %tumor_code, error = %e, "Deep report failed");
                REPORT_FAILED.to_string()
            });
        let succeeded = outcome.is_ok();

        let resolution = self.state.write().await.report.complete(ticket, outcome);
        match resolution {
            Resolution::Applied if succeeded => {
                let _ = self.events.send(DashboardEvent::FocusReport {
                    symbol: symbol.to_string(),
                });
            }
            Resolution::Applied => {}
            Resolution::Stale => debug!(symbol = %symbol, "Discarded superseded deep report"),
        }
        Ok(resolution)
    }

    pub async fn search_state(&self) -> RequestState<SearchResult> {
        self.state.read().await.search.state().clone()
    }

    pub async fn report_state(&self) -> RequestState<DetailedAnalysisResult> {
        self.state.read().await.report.state().clone()
    }

    /// The report's survival points merged onto one time axis
    pub async fn aligned_survival(&self) -> Option<Vec<AlignedSurvivalPoint>> {
        let state = self.state.read().await;
        state
            .report
            .state()
            .data()
            .map(|report| align_survival_curve(&report.survival.data))
    }

    pub async fn view(&self) -> DashboardView {
        let state = self.state.read().await;
        let report = state.report.state().data();

        DashboardView {
            search: state.search.state().clone(),
            report: state.report.state().clone(),
            survival_curve: report.map(|r| align_survival_curve(&r.survival.data)),
            stage_breakdown: report.and_then(|r| r.stage_feature().cloned()),
            sample_preview: report.map(|r| r.survival.sample_preview(SAMPLE_PREVIEW_ROWS)),
        }
    }

    /// Candidate list as CSV; `None` unless the search slot holds a success
    pub async fn export_current_search(&self) -> AppResult<Option<ExportArtifact>> {
        let state = self.state.read().await;
        match state.search.state().data() {
            Some(result) => {
                export::export_expression(&result.tumor_code, result.category, &result.records)
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    /// Clinical samples of the current report as CSV; `None` when there is
    /// no report or it has no samples
    pub async fn export_current_samples(&self) -> AppResult<Option<ExportArtifact>> {
        let state = self.state.read().await;
        match state.report.state().data() {
            Some(report) if !report.survival.samples.is_empty() => {
                export::export_samples(report).map(Some)
            }
            _ => Ok(None),
        }
    }
}
