//! Fund operations service
//!
//! Entry point used by the HTTP layer. Resolves query types to read views,
//! runs commands through the port in the configured [`CommandMode`], and
//! builds relationship profiles.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use core_kernel::{FundId, HealthCheckResult, InvestorId, PortError};

use crate::analytics::{analyze_expenses, overview, ExpenseAnalysis, FundOverview, FundPerformance};
use crate::capital_call::FundCapitalCall;
use crate::command::{CommandAcknowledgment, CommandMode, CommandReceipt, FundCommand};
use crate::commitment::FundCommitment;
use crate::dataset::FundOperationsDataset;
use crate::distribution::FundDistribution;
use crate::expense::FundExpense;
use crate::fund::Fund;
use crate::nav::NavReport;
use crate::ports::FundOperationsPort;
use crate::relationship::{self, RelationshipProfile};

/// Read views selectable by the `type` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Overview,
    Funds,
    Commitments,
    CapitalCalls,
    Distributions,
    Expenses,
    NavReports,
    FundPerformance,
    ExpenseAnalysis,
    /// Every collection, unfiltered
    All,
}

impl QueryKind {
    /// Absent or unrecognized types fall back to [`QueryKind::All`]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("overview") => QueryKind::Overview,
            Some("funds") => QueryKind::Funds,
            Some("commitments") => QueryKind::Commitments,
            Some("capital-calls") => QueryKind::CapitalCalls,
            Some("distributions") => QueryKind::Distributions,
            Some("expenses") => QueryKind::Expenses,
            Some("nav-reports") => QueryKind::NavReports,
            Some("fund-performance") => QueryKind::FundPerformance,
            Some("expense-analysis") => QueryKind::ExpenseAnalysis,
            _ => QueryKind::All,
        }
    }
}

/// Payload of a read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Overview(FundOverview),
    Funds(Vec<Fund>),
    Commitments(Vec<FundCommitment>),
    CapitalCalls(Vec<FundCapitalCall>),
    Distributions(Vec<FundDistribution>),
    Expenses(Vec<FundExpense>),
    NavReports(Vec<NavReport>),
    FundPerformance(FundPerformance),
    ExpenseAnalysis(ExpenseAnalysis),
    All(FundOperationsDataset),
}

#[derive(Clone)]
pub struct FundOperationsService {
    port: Arc<dyn FundOperationsPort>,
    mode: CommandMode,
}

impl FundOperationsService {
    pub fn new(port: Arc<dyn FundOperationsPort>, mode: CommandMode) -> Self {
        Self { port, mode }
    }

    pub fn command_mode(&self) -> CommandMode {
        self.mode
    }

    /// Resolves a read view, filtered by `fund_id` where the view supports it
    #[instrument(skip(self))]
    pub async fn query(
        &self,
        kind: QueryKind,
        fund_id: Option<&FundId>,
    ) -> Result<QueryResult, PortError> {
        debug!(?kind, "resolving fund operations query");

        let result = match kind {
            QueryKind::Overview => QueryResult::Overview(overview(self.port.funds(None).await?)),
            QueryKind::Funds => QueryResult::Funds(self.port.funds(fund_id).await?),
            QueryKind::Commitments => QueryResult::Commitments(self.port.commitments(fund_id).await?),
            QueryKind::CapitalCalls => {
                QueryResult::CapitalCalls(self.port.capital_calls(fund_id).await?)
            }
            QueryKind::Distributions => {
                QueryResult::Distributions(self.port.distributions(fund_id).await?)
            }
            QueryKind::Expenses => QueryResult::Expenses(self.port.expenses(fund_id).await?),
            QueryKind::NavReports => QueryResult::NavReports(self.port.nav_reports(fund_id).await?),
            QueryKind::FundPerformance => {
                let id = fund_id.ok_or_else(|| PortError::not_found("Fund", "(none)"))?;
                let fund = self.port.fund(id).await?;
                QueryResult::FundPerformance(FundPerformance::from(&fund))
            }
            QueryKind::ExpenseAnalysis => {
                let expenses = self.port.expenses(fund_id).await?;
                QueryResult::ExpenseAnalysis(analyze_expenses(&expenses))
            }
            QueryKind::All => QueryResult::All(self.port.snapshot().await?),
        };

        Ok(result)
    }

    /// Parses and runs a write command
    #[instrument(skip(self, data), fields(mode = %self.mode))]
    pub async fn execute(
        &self,
        action: &str,
        data: serde_json::Value,
    ) -> Result<CommandReceipt, PortError> {
        let command = FundCommand::parse(action, data).map_err(|e| {
            warn!(error = %e, "rejected fund operations command");
            PortError::from(e)
        })?;

        let now = Utc::now();
        let record = self.port.apply(&command, self.mode, now).await?;

        info!(
            action = %command.action(),
            record_id = record.id(),
            persisted = self.mode.persists(),
            "fund operations command processed"
        );

        Ok(CommandReceipt {
            action: command.action(),
            acknowledgment: CommandAcknowledgment {
                record,
                processed_at: now,
                persisted: self.mode.persists(),
            },
        })
    }

    /// Profiles for every investor, healthiest first
    pub async fn relationship_profiles(&self) -> Result<Vec<RelationshipProfile>, PortError> {
        let commitments = self.port.commitments(None).await?;
        Ok(relationship::profiles(&commitments))
    }

    pub async fn relationship_profile(
        &self,
        investor_id: &InvestorId,
    ) -> Result<RelationshipProfile, PortError> {
        self.relationship_profiles()
            .await?
            .into_iter()
            .find(|p| &p.investor_id == investor_id)
            .ok_or_else(|| PortError::not_found("Investor", investor_id))
    }

    pub async fn health_check(&self) -> HealthCheckResult {
        self.port.health_check().await
    }
}
