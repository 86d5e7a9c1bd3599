//! Fund Operations Domain
//!
//! Back-office records of a private-markets fund manager and the read and
//! write operations served over them.
//!
//! # Key Concepts
//!
//! - **Fund**: A pooled vehicle with economics, key dates, and performance
//! - **Commitment**: An LP's pledge to a fund, drawn down over time
//! - **Capital Call**: A drawdown notice against commitments
//! - **Distribution**: Cash or stock returned to LPs, split by source
//! - **Expense**: A fund cost moving through `PENDING -> APPROVED -> PAID`
//! - **NAV Report**: A periodic valuation moving from draft to published
//!
//! # Layout
//!
//! Record types live in their own modules. [`dataset`] holds the six
//! collections, [`analytics`] computes read views, [`command`] plans write
//! commands, [`ports`] defines the storage seam and the in-memory adapter,
//! and [`service`] ties them together for the HTTP layer.

pub mod analytics;
pub mod capital_call;
pub mod command;
pub mod commitment;
pub mod dataset;
pub mod distribution;
pub mod error;
pub mod expense;
pub mod fund;
pub mod nav;
pub mod ports;
pub mod relationship;
pub mod service;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Largest money amount a record may carry.
///
/// Aggregations sum many records, so amounts are kept far below
/// `Decimal::MAX` to leave headroom for the totals.
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000_000_000);

pub use analytics::{ExpenseAnalysis, FundOverview, FundPerformance, FundSummary};
pub use capital_call::{CapitalCallStatus, FundCapitalCall};
pub use command::{
    ActionKind, CommandAcknowledgment, CommandMode, CommandReceipt, CommandRecord, FundCommand,
};
pub use commitment::{CommitmentStatus, FundCommitment, InvestorType};
pub use dataset::FundOperationsDataset;
pub use distribution::{DistributionStatus, DistributionType, FundDistribution};
pub use error::FundError;
pub use expense::{ExpenseCategory, ExpenseStatus, ExpenseType, FundExpense};
pub use fund::{Fund, FundStatus, FundType};
pub use nav::{NavReport, NavReportStatus};
pub use ports::{FundOperationsPort, InMemoryFundStore};
pub use relationship::{RelationshipProfile, RiskBand};
pub use service::{FundOperationsService, QueryKind, QueryResult};
