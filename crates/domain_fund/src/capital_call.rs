//! Capital calls (drawdown requests to LPs)
//!
//! ```text
//! DRAFT -> ISSUED -> PARTIALLY_FUNDED / OVERDUE -> FUNDED
//!   \________\_____________\______________________-> CANCELLED
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{CapitalCallId, FundId};

use crate::error::FundError;

/// Allowed gap between funded + outstanding and the call amount (rounding on LP allocations)
pub const FUNDING_TOLERANCE: Decimal = dec!(1.00);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapitalCallStatus {
    Draft,
    Issued,
    PartiallyFunded,
    Funded,
    Overdue,
    Cancelled,
}

impl CapitalCallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapitalCallStatus::Draft => "DRAFT",
            CapitalCallStatus::Issued => "ISSUED",
            CapitalCallStatus::PartiallyFunded => "PARTIALLY_FUNDED",
            CapitalCallStatus::Funded => "FUNDED",
            CapitalCallStatus::Overdue => "OVERDUE",
            CapitalCallStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CapitalCallStatus::Funded | CapitalCallStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: CapitalCallStatus) -> bool {
        use CapitalCallStatus::*;
        match (self, next) {
            (Draft, Issued) => true,
            (Issued, PartiallyFunded | Funded | Overdue) => true,
            (PartiallyFunded, Funded | Overdue) => true,
            (Overdue, PartiallyFunded | Funded) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for CapitalCallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A drawdown request against LP commitments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundCapitalCall {
    pub id: CapitalCallId,
    pub fund_id: FundId,
    pub call_number: u32,
    pub call_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_call_amount: Decimal,
    pub purpose: String,
    pub status: CapitalCallStatus,
    pub total_funded: Decimal,
    pub total_outstanding: Decimal,
    /// LPs that have acknowledged the notice
    pub investors_acknowledged: u32,
    pub total_investors: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funded_at: Option<DateTime<Utc>>,
}

impl FundCapitalCall {
    /// Moves the call to `next`, rejecting moves the lifecycle does not allow
    pub fn transition(&mut self, next: CapitalCallStatus) -> Result<(), FundError> {
        if !self.status.can_transition_to(next) {
            return Err(FundError::InvalidTransition {
                entity: "Capital call",
                id: self.id.to_string(),
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// Records full receipt of the call from every LP
    pub fn mark_funded(&mut self, at: DateTime<Utc>) -> Result<(), FundError> {
        self.transition(CapitalCallStatus::Funded)?;
        self.total_funded = self.total_call_amount;
        self.total_outstanding = Decimal::ZERO;
        self.investors_acknowledged = self.total_investors;
        self.funded_at = Some(at);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), FundError> {
        let gap = (self.total_funded + self.total_outstanding - self.total_call_amount).abs();
        if gap > FUNDING_TOLERANCE {
            return Err(FundError::invariant(format!(
                "capital call {} funded {} + outstanding {} does not match {}",
                self.id, self.total_funded, self.total_outstanding, self.total_call_amount
            )));
        }
        if self.investors_acknowledged > self.total_investors {
            return Err(FundError::invariant(format!(
                "capital call {} has more acknowledgements than investors",
                self.id
            )));
        }
        Ok(())
    }
}
