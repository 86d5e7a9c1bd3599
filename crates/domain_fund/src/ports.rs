//! Fund Operations Port
//!
//! The port the service depends on, and the in-memory adapter that ships
//! with the crate. The adapter holds the whole dataset behind one
//! `RwLock`: reads clone what they need and release the lock, persisted
//! commands plan and commit under a single write guard.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use core_kernel::{AdapterHealth, DomainPort, FundId, HealthCheckResult, HealthCheckable, PortError};

use crate::capital_call::FundCapitalCall;
use crate::command::{CommandMode, CommandRecord, FundCommand};
use crate::commitment::FundCommitment;
use crate::dataset::{filter_by_fund, FundOperationsDataset};
use crate::distribution::FundDistribution;
use crate::error::FundError;
use crate::expense::FundExpense;
use crate::fund::Fund;
use crate::nav::NavReport;

/// Data access for fund operations
#[async_trait]
pub trait FundOperationsPort: DomainPort + HealthCheckable {
    async fn funds(&self, fund_id: Option<&FundId>) -> Result<Vec<Fund>, PortError>;

    /// A single fund, `NotFound` when absent
    async fn fund(&self, id: &FundId) -> Result<Fund, PortError>;

    async fn commitments(&self, fund_id: Option<&FundId>) -> Result<Vec<FundCommitment>, PortError>;

    async fn capital_calls(&self, fund_id: Option<&FundId>)
        -> Result<Vec<FundCapitalCall>, PortError>;

    async fn distributions(&self, fund_id: Option<&FundId>)
        -> Result<Vec<FundDistribution>, PortError>;

    async fn expenses(&self, fund_id: Option<&FundId>) -> Result<Vec<FundExpense>, PortError>;

    async fn nav_reports(&self, fund_id: Option<&FundId>) -> Result<Vec<NavReport>, PortError>;

    /// A consistent copy of every collection
    async fn snapshot(&self) -> Result<FundOperationsDataset, PortError>;

    /// Plans `command` and, in persist mode, commits the result
    async fn apply(
        &self,
        command: &FundCommand,
        mode: CommandMode,
        now: DateTime<Utc>,
    ) -> Result<CommandRecord, PortError>;
}

/// Dataset held in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryFundStore {
    dataset: Arc<RwLock<FundOperationsDataset>>,
}

impl InMemoryFundStore {
    pub fn new(dataset: FundOperationsDataset) -> Self {
        Self {
            dataset: Arc::new(RwLock::new(dataset)),
        }
    }

    /// Store seeded with the bundled dataset
    pub fn bundled() -> Result<Self, FundError> {
        Ok(Self::new(FundOperationsDataset::bundled()?))
    }
}

impl DomainPort for InMemoryFundStore {}

#[async_trait]
impl HealthCheckable for InMemoryFundStore {
    async fn health_check(&self) -> HealthCheckResult {
        let started = Instant::now();
        let dataset = self.dataset.read().await;
        let (status, message) = match dataset.validate() {
            Ok(()) => (
                AdapterHealth::Healthy,
                format!(
                    "{} funds, {} commitments, {} capital calls",
                    dataset.funds.len(),
                    dataset.commitments.len(),
                    dataset.capital_calls.len()
                ),
            ),
            Err(e) => (AdapterHealth::Unhealthy, e.to_string()),
        };

        HealthCheckResult {
            adapter_id: "in-memory-fund-store".to_string(),
            status,
            latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            message: Some(message),
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl FundOperationsPort for InMemoryFundStore {
    async fn funds(&self, fund_id: Option<&FundId>) -> Result<Vec<Fund>, PortError> {
        Ok(filter_by_fund(&self.dataset.read().await.funds, fund_id))
    }

    async fn fund(&self, id: &FundId) -> Result<Fund, PortError> {
        self.dataset
            .read()
            .await
            .fund(id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Fund", id))
    }

    async fn commitments(&self, fund_id: Option<&FundId>) -> Result<Vec<FundCommitment>, PortError> {
        Ok(filter_by_fund(&self.dataset.read().await.commitments, fund_id))
    }

    async fn capital_calls(
        &self,
        fund_id: Option<&FundId>,
    ) -> Result<Vec<FundCapitalCall>, PortError> {
        Ok(filter_by_fund(&self.dataset.read().await.capital_calls, fund_id))
    }

    async fn distributions(
        &self,
        fund_id: Option<&FundId>,
    ) -> Result<Vec<FundDistribution>, PortError> {
        Ok(filter_by_fund(&self.dataset.read().await.distributions, fund_id))
    }

    async fn expenses(&self, fund_id: Option<&FundId>) -> Result<Vec<FundExpense>, PortError> {
        Ok(filter_by_fund(&self.dataset.read().await.expenses, fund_id))
    }

    async fn nav_reports(&self, fund_id: Option<&FundId>) -> Result<Vec<NavReport>, PortError> {
        Ok(filter_by_fund(&self.dataset.read().await.nav_reports, fund_id))
    }

    async fn snapshot(&self) -> Result<FundOperationsDataset, PortError> {
        Ok(self.dataset.read().await.clone())
    }

    async fn apply(
        &self,
        command: &FundCommand,
        mode: CommandMode,
        now: DateTime<Utc>,
    ) -> Result<CommandRecord, PortError> {
        match mode {
            CommandMode::Persist => {
                let mut dataset = self.dataset.write().await;
                let record = command.plan(&dataset, now)?;
                dataset.commit(record.clone());
                Ok(record)
            }
            CommandMode::Acknowledge => {
                let dataset = self.dataset.read().await;
                Ok(command.plan(&dataset, now)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capital_call::CapitalCallStatus;
    use serde_json::json;

    fn fund_call_command(id: &str) -> FundCommand {
        FundCommand::parse("fund_capital_call", json!({ "capitalCallId": id })).unwrap()
    }

    #[tokio::test]
    async fn test_fund_lookup() {
        let store = InMemoryFundStore::bundled().unwrap();
        assert_eq!(store.fund(&FundId::new("fund-3")).await.unwrap().fund_name, "Summit Ventures I");

        let err = store.fund(&FundId::new("fund-404")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_persist_mode_commits() {
        let store = InMemoryFundStore::bundled().unwrap();
        store
            .apply(&fund_call_command("call-2"), CommandMode::Persist, Utc::now())
            .await
            .unwrap();

        let calls = store.capital_calls(Some(&FundId::new("fund-1"))).await.unwrap();
        let call = calls.iter().find(|c| c.id == "call-2").unwrap();
        assert_eq!(call.status, CapitalCallStatus::Funded);
        assert_eq!(calls.len(), 2);
    }

    #[tokio::test]
    async fn test_acknowledge_mode_leaves_store_unchanged() {
        let store = InMemoryFundStore::bundled().unwrap();
        let before = store.snapshot().await.unwrap();

        let record = store
            .apply(&fund_call_command("call-2"), CommandMode::Acknowledge, Utc::now())
            .await
            .unwrap();

        assert!(matches!(record, CommandRecord::CapitalCall(ref c) if c.status == CapitalCallStatus::Funded));
        assert_eq!(store.snapshot().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_failed_command_is_not_committed() {
        let store = InMemoryFundStore::bundled().unwrap();
        let before = store.snapshot().await.unwrap();

        let err = store
            .apply(&fund_call_command("call-1"), CommandMode::Persist, Utc::now())
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        assert_eq!(store.snapshot().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_health_check_reports_healthy() {
        let store = InMemoryFundStore::bundled().unwrap();
        let health = store.health_check().await;
        assert_eq!(health.status, AdapterHealth::Healthy);
        assert!(health.message.unwrap().contains("4 funds"));
    }
}
