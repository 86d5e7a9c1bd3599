//! Core Kernel - Foundational types for the fund operations system
//!
//! This crate provides the building blocks shared by the domain and API crates:
//! - Strongly-typed record identifiers
//! - Port traits and the common port error type

pub mod identifiers;
pub mod ports;

pub use identifiers::{
    FundId, CommitmentId, InvestorId, CapitalCallId, DistributionId, ExpenseId, NavReportId,
};
pub use ports::{PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable};
