//! The fund operations dataset
//!
//! One value holding the six record collections. It is loaded once (bundled
//! JSON or a file supplied at startup), validated as a whole, and afterwards
//! only changed through [`FundOperationsDataset::commit`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use core_kernel::FundId;

use crate::capital_call::FundCapitalCall;
use crate::command::CommandRecord;
use crate::commitment::FundCommitment;
use crate::distribution::FundDistribution;
use crate::error::FundError;
use crate::expense::FundExpense;
use crate::fund::Fund;
use crate::nav::NavReport;

const BUNDLED_DATASET: &str = include_str!("../data/fund_operations.json");

/// Records that belong to exactly one fund
pub trait FundScoped {
    fn fund_id(&self) -> &FundId;
}

impl FundScoped for Fund {
    fn fund_id(&self) -> &FundId {
        &self.id
    }
}

macro_rules! fund_scoped {
    ($($record:ty),+ $(,)?) => {
        $(
            impl FundScoped for $record {
                fn fund_id(&self) -> &FundId {
                    &self.fund_id
                }
            }
        )+
    };
}

fund_scoped!(FundCommitment, FundCapitalCall, FundDistribution, FundExpense, NavReport);

/// Clones the records belonging to `fund_id`, or all of them when no filter is given
pub fn filter_by_fund<T: FundScoped + Clone>(records: &[T], fund_id: Option<&FundId>) -> Vec<T> {
    match fund_id {
        Some(id) => records.iter().filter(|r| r.fund_id() == id).cloned().collect(),
        None => records.to_vec(),
    }
}

/// All fund operations collections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundOperationsDataset {
    #[serde(default)]
    pub funds: Vec<Fund>,
    #[serde(default)]
    pub commitments: Vec<FundCommitment>,
    #[serde(default)]
    pub capital_calls: Vec<FundCapitalCall>,
    #[serde(default)]
    pub distributions: Vec<FundDistribution>,
    #[serde(default)]
    pub expenses: Vec<FundExpense>,
    #[serde(default)]
    pub nav_reports: Vec<NavReport>,
}

impl FundOperationsDataset {
    /// The dataset shipped with the crate
    pub fn bundled() -> Result<Self, FundError> {
        Self::from_json(BUNDLED_DATASET)
    }

    /// Parses and validates a dataset from JSON text
    pub fn from_json(json: &str) -> Result<Self, FundError> {
        let dataset: Self =
            serde_json::from_str(json).map_err(|e| FundError::Seed(e.to_string()))?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Reads, parses, and validates a dataset file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FundError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| FundError::Seed(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn fund(&self, id: &FundId) -> Option<&Fund> {
        self.funds.iter().find(|f| &f.id == id)
    }

    /// Validates every record plus cross-record constraints
    pub fn validate(&self) -> Result<(), FundError> {
        let mut fund_ids = HashSet::new();
        for fund in &self.funds {
            fund.validate()?;
            if !fund_ids.insert(fund.id.as_str()) {
                return Err(FundError::invariant(format!("duplicate fund id {}", fund.id)));
            }
        }

        for commitment in &self.commitments {
            commitment.validate()?;
        }
        for call in &self.capital_calls {
            call.validate()?;
        }
        for distribution in &self.distributions {
            distribution.validate()?;
        }
        for expense in &self.expenses {
            expense.validate()?;
        }
        for report in &self.nav_reports {
            report.validate()?;
        }

        check_references("commitment", &self.commitments, &fund_ids)?;
        check_references("capital call", &self.capital_calls, &fund_ids)?;
        check_references("distribution", &self.distributions, &fund_ids)?;
        check_references("expense", &self.expenses, &fund_ids)?;
        check_references("NAV report", &self.nav_reports, &fund_ids)?;

        check_unique("commitment", self.commitments.iter().map(|c| c.id.as_str()))?;
        check_unique("capital call", self.capital_calls.iter().map(|c| c.id.as_str()))?;
        check_unique("distribution", self.distributions.iter().map(|d| d.id.as_str()))?;
        check_unique("expense", self.expenses.iter().map(|e| e.id.as_str()))?;
        check_unique("NAV report", self.nav_reports.iter().map(|n| n.id.as_str()))?;

        Ok(())
    }

    /// Applies a planned command result: appends new records, replaces updated ones by id
    pub fn commit(&mut self, record: CommandRecord) {
        match record {
            CommandRecord::CapitalCall(call) => upsert(&mut self.capital_calls, call, |c| &c.id),
            CommandRecord::Distribution(distribution) => {
                upsert(&mut self.distributions, distribution, |d| &d.id)
            }
            CommandRecord::Expense(expense) => upsert(&mut self.expenses, expense, |e| &e.id),
            CommandRecord::NavReport(report) => upsert(&mut self.nav_reports, report, |n| &n.id),
            CommandRecord::Commitment(commitment) => {
                upsert(&mut self.commitments, commitment, |c| &c.id)
            }
        }
    }
}

fn check_references<T: FundScoped>(
    entity: &str,
    records: &[T],
    fund_ids: &HashSet<&str>,
) -> Result<(), FundError> {
    for record in records {
        if !fund_ids.contains(record.fund_id().as_str()) {
            return Err(FundError::invariant(format!(
                "{} references unknown fund {}",
                entity,
                record.fund_id()
            )));
        }
    }
    Ok(())
}

fn check_unique<'a>(entity: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), FundError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(FundError::invariant(format!("duplicate {} id {}", entity, id)));
        }
    }
    Ok(())
}

fn upsert<T, K: PartialEq>(records: &mut Vec<T>, record: T, key: impl Fn(&T) -> &K) {
    let existing = records.iter().position(|r| key(r) == key(&record));
    match existing {
        Some(index) => records[index] = record,
        None => records.push(record),
    }
}
