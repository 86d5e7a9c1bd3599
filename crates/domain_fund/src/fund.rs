//! Fund definition
//!
//! A fund is the top-level vehicle every other operations record hangs off.
//! The performance block is a reporting snapshot: it is loaded with the
//! dataset and is not recomputed by commands.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::FundId;

use crate::error::FundError;

/// Investment strategy of a fund
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundType {
    Buyout,
    GrowthEquity,
    VentureCapital,
    RealEstate,
    Infrastructure,
    Credit,
    FundOfFunds,
}

/// Lifecycle stage of a fund
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundStatus {
    /// Still raising capital, before final close
    Fundraising,
    /// Inside the investment period, deploying capital
    Investing,
    /// Realizing portfolio companies
    Harvesting,
    /// Winding down remaining positions
    Liquidating,
    Closed,
}

impl FundStatus {
    /// Active funds are the ones deploying or realizing capital
    pub fn is_active(&self) -> bool {
        matches!(self, FundStatus::Investing | FundStatus::Harvesting)
    }
}

/// A private-equity fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    /// Unique identifier
    pub id: FundId,
    /// Display name
    pub fund_name: String,
    /// Sequence number within the fund family (Fund I, II, ...)
    pub fund_number: u32,
    pub fund_type: FundType,
    pub status: FundStatus,
    /// Vintage year
    pub vintage: i32,
    /// ISO 4217 currency code
    pub currency: String,

    /// Target fund size
    pub target_size: Decimal,
    /// Maximum fund size
    pub hard_cap: Decimal,
    /// Minimum size required to hold a first close
    pub minimum_size: Decimal,
    /// Annual management fee as a decimal (0.02 = 2%)
    pub management_fee: Decimal,
    /// Carried interest as a decimal (0.20 = 20%)
    pub carried_interest: Decimal,
    /// Preferred return hurdle as a decimal
    pub hurdle_rate: Decimal,

    pub first_close: NaiveDate,
    pub final_close: Option<NaiveDate>,
    pub investment_period_end: NaiveDate,
    pub maturity_date: NaiveDate,

    pub total_commitments: Decimal,
    pub total_called: Decimal,
    pub total_distributed: Decimal,
    #[serde(rename = "currentNAV")]
    pub current_nav: Decimal,

    #[serde(rename = "grossIRR", default)]
    pub gross_irr: Option<Decimal>,
    #[serde(rename = "netIRR", default)]
    pub net_irr: Option<Decimal>,
    #[serde(rename = "grossMOIC", default)]
    pub gross_moic: Option<Decimal>,
    #[serde(rename = "netMOIC", default)]
    pub net_moic: Option<Decimal>,
    #[serde(default)]
    pub dpi: Option<Decimal>,
    #[serde(default)]
    pub rvpi: Option<Decimal>,
    #[serde(default)]
    pub tvpi: Option<Decimal>,
}

impl Fund {
    /// Committed capital not yet drawn down
    pub fn uncalled_capital(&self) -> Decimal {
        self.total_commitments - self.total_called
    }

    /// Checks the reference-data invariants of a fund record
    pub fn validate(&self) -> Result<(), FundError> {
        if self.total_called > self.total_commitments {
            return Err(FundError::invariant(format!(
                "fund {} has called {} against commitments of {}",
                self.id, self.total_called, self.total_commitments
            )));
        }
        if self.current_nav < Decimal::ZERO {
            return Err(FundError::invariant(format!(
                "fund {} has negative NAV {}",
                self.id, self.current_nav
            )));
        }
        if self.minimum_size > self.hard_cap {
            return Err(FundError::invariant(format!(
                "fund {} minimum size exceeds hard cap",
                self.id
            )));
        }
        Ok(())
    }
}
