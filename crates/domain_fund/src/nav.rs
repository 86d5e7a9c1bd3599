//! Net Asset Value (NAV) reporting
//!
//! NAV reports are periodic valuation snapshots that move through a review
//! workflow before being published to LPs.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{FundId, NavReportId};

use crate::error::FundError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NavReportStatus {
    Draft,
    UnderReview,
    Approved,
    Published,
}

impl NavReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavReportStatus::Draft => "DRAFT",
            NavReportStatus::UnderReview => "UNDER_REVIEW",
            NavReportStatus::Approved => "APPROVED",
            NavReportStatus::Published => "PUBLISHED",
        }
    }

    pub fn can_transition_to(&self, next: NavReportStatus) -> bool {
        use NavReportStatus::*;
        matches!(
            (self, next),
            (Draft, UnderReview)
                | (UnderReview, Approved)
                | (UnderReview, Draft)
                | (Draft | UnderReview | Approved, Published)
        )
    }
}

impl fmt::Display for NavReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A periodic valuation of a fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavReport {
    pub id: NavReportId,
    pub fund_id: FundId,
    /// Reporting period label, e.g. `Q4 2023`
    pub reporting_period: String,
    pub as_of_date: NaiveDate,
    #[serde(rename = "totalNAV")]
    pub total_nav: Decimal,
    #[serde(default)]
    pub nav_per_unit: Option<Decimal>,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub unrealized_gains: Decimal,
    pub realized_gains: Decimal,
    pub status: NavReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl NavReport {
    /// Publishes the report to LPs
    pub fn publish(&mut self, at: DateTime<Utc>) -> Result<(), FundError> {
        if !self.status.can_transition_to(NavReportStatus::Published) {
            return Err(FundError::InvalidTransition {
                entity: "NAV report",
                id: self.id.to_string(),
                from: self.status.to_string(),
                to: NavReportStatus::Published.to_string(),
            });
        }
        self.status = NavReportStatus::Published;
        self.published_at = Some(at);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), FundError> {
        if self.total_nav < Decimal::ZERO {
            return Err(FundError::invariant(format!(
                "NAV report {} has negative NAV",
                self.id
            )));
        }
        if self.total_assets - self.total_liabilities != self.total_nav {
            return Err(FundError::invariant(format!(
                "NAV report {} assets less liabilities does not equal total NAV",
                self.id
            )));
        }
        Ok(())
    }
}
