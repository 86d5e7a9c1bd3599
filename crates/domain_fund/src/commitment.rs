//! LP commitments

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CommitmentId, FundId, InvestorId};

use crate::error::FundError;
use crate::MAX_AMOUNT;

/// Classification of the limited partner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestorType {
    PensionFund,
    Endowment,
    Foundation,
    SovereignWealth,
    FamilyOffice,
    Insurance,
    FundOfFunds,
    HighNetWorth,
    Other,
}

/// Standing of a commitment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommitmentStatus {
    Active,
    /// Subscription received but not yet accepted at a close
    Pending,
    /// Sold on the secondary market
    Transferred,
    /// Investor failed to fund a capital call
    Defaulted,
}

/// An investor's pledge to a fund, with running totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundCommitment {
    pub id: CommitmentId,
    pub fund_id: FundId,
    pub investor_id: InvestorId,
    pub investor_name: String,
    pub investor_type: InvestorType,
    pub commitment_amount: Decimal,
    pub commitment_date: NaiveDate,
    pub called_amount: Decimal,
    pub distributed_amount: Decimal,
    #[serde(rename = "currentNAV")]
    pub current_nav: Decimal,
    pub status: CommitmentStatus,
}

impl FundCommitment {
    /// Commitment not yet called
    pub fn unfunded_commitment(&self) -> Decimal {
        self.commitment_amount - self.called_amount
    }

    pub fn validate(&self) -> Result<(), FundError> {
        if self.called_amount > self.commitment_amount {
            return Err(FundError::invariant(format!(
                "commitment {} has called {} against {}",
                self.id, self.called_amount, self.commitment_amount
            )));
        }
        if self.commitment_amount <= Decimal::ZERO {
            return Err(FundError::invariant(format!(
                "commitment {} must have a positive amount",
                self.id
            )));
        }
        if [self.commitment_amount, self.distributed_amount, self.current_nav]
            .iter()
            .any(|amount| *amount > MAX_AMOUNT)
        {
            return Err(FundError::invariant(format!(
                "commitment {} exceeds the maximum amount",
                self.id
            )));
        }
        Ok(())
    }
}
