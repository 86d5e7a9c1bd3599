//! Write commands
//!
//! A command is handled in two steps. [`FundCommand::plan`] validates the
//! payload against the current dataset and builds the record the command
//! would produce, without touching the dataset. The caller then decides
//! whether to hand that record to [`FundOperationsDataset::commit`]
//! (persist mode) or only return it (acknowledge mode).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use core_kernel::{
    CapitalCallId, CommitmentId, DistributionId, ExpenseId, FundId, InvestorId, NavReportId,
};

use crate::capital_call::{CapitalCallStatus, FundCapitalCall};
use crate::commitment::{CommitmentStatus, FundCommitment, InvestorType};
use crate::dataset::FundOperationsDataset;
use crate::distribution::{DistributionStatus, DistributionType, FundDistribution};
use crate::error::FundError;
use crate::expense::{ExpenseCategory, ExpenseStatus, ExpenseType, FundExpense};
use crate::fund::{Fund, FundStatus};
use crate::nav::{NavReport, NavReportStatus};
use crate::MAX_AMOUNT;

/// The write actions accepted by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    CreateCapitalCall,
    ProcessDistribution,
    RecordExpense,
    GenerateNav,
    AddCommitment,
    ApproveExpense,
    FundCapitalCall,
    PublishNav,
}

impl ActionKind {
    pub const ALL: [ActionKind; 8] = [
        ActionKind::CreateCapitalCall,
        ActionKind::ProcessDistribution,
        ActionKind::RecordExpense,
        ActionKind::GenerateNav,
        ActionKind::AddCommitment,
        ActionKind::ApproveExpense,
        ActionKind::FundCapitalCall,
        ActionKind::PublishNav,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CreateCapitalCall => "create_capital_call",
            ActionKind::ProcessDistribution => "process_distribution",
            ActionKind::RecordExpense => "record_expense",
            ActionKind::GenerateNav => "generate_nav",
            ActionKind::AddCommitment => "add_commitment",
            ActionKind::ApproveExpense => "approve_expense",
            ActionKind::FundCapitalCall => "fund_capital_call",
            ActionKind::PublishNav => "publish_nav",
        }
    }

    /// Message returned alongside a successful command
    pub fn success_message(&self) -> &'static str {
        match self {
            ActionKind::CreateCapitalCall => "Capital call created successfully",
            ActionKind::ProcessDistribution => "Distribution processing initiated",
            ActionKind::RecordExpense => "Expense recorded successfully",
            ActionKind::GenerateNav => "NAV report generated successfully",
            ActionKind::AddCommitment => "Commitment added successfully",
            ActionKind::ApproveExpense => "Expense approved successfully",
            ActionKind::FundCapitalCall => "Capital call funded successfully",
            ActionKind::PublishNav => "NAV report published successfully",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = FundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| FundError::invalid_command(format!("Invalid action: {}", s)))
    }
}

fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("must_be_positive"));
    }
    bounded_amount(value)
}

fn non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("must_not_be_negative"));
    }
    bounded_amount(value)
}

fn bounded_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value > MAX_AMOUNT {
        return Err(ValidationError::new("exceeds_maximum_amount"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCapitalCall {
    pub fund_id: FundId,
    #[validate(range(min = 1))]
    pub call_number: u32,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub call_date: Option<NaiveDate>,
    #[serde(default)]
    pub purpose: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDistribution {
    pub fund_id: FundId,
    #[validate(range(min = 1))]
    pub distribution_number: u32,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    pub distribution_date: NaiveDate,
    #[serde(default)]
    pub distribution_type: Option<DistributionType>,
    #[serde(default)]
    pub return_of_capital: Option<Decimal>,
    #[serde(default)]
    pub capital_gains: Option<Decimal>,
    #[serde(default)]
    pub dividend_income: Option<Decimal>,
    #[serde(default)]
    pub interest_income: Option<Decimal>,
    #[serde(default)]
    pub carried_interest: Option<Decimal>,
    #[serde(default)]
    pub tax_withholding: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordExpense {
    pub fund_id: FundId,
    pub category: ExpenseCategory,
    #[serde(default)]
    pub expense_type: Option<ExpenseType>,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub expense_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateNav {
    pub fund_id: FundId,
    #[validate(length(min = 1))]
    pub reporting_period: String,
    pub as_of_date: NaiveDate,
    #[validate(custom(function = "non_negative_amount"))]
    pub total_assets: Decimal,
    #[validate(custom(function = "non_negative_amount"))]
    pub total_liabilities: Decimal,
    #[serde(default)]
    pub unrealized_gains: Option<Decimal>,
    #[serde(default)]
    pub realized_gains: Option<Decimal>,
    #[serde(default)]
    pub nav_per_unit: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCommitment {
    pub fund_id: FundId,
    pub investor_id: InvestorId,
    #[validate(length(min = 1))]
    pub investor_name: String,
    #[serde(default)]
    pub investor_type: Option<InvestorType>,
    #[validate(custom(function = "positive_amount"))]
    pub commitment_amount: Decimal,
    #[serde(default)]
    pub commitment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApproveExpense {
    pub expense_id: ExpenseId,
    #[serde(default)]
    pub approved_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FundCapitalCallPayload {
    pub capital_call_id: CapitalCallId,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PublishNav {
    pub nav_report_id: NavReportId,
}

/// A parsed, validated write command
#[derive(Debug, Clone)]
pub enum FundCommand {
    CreateCapitalCall(CreateCapitalCall),
    ProcessDistribution(ProcessDistribution),
    RecordExpense(RecordExpense),
    GenerateNav(GenerateNav),
    AddCommitment(AddCommitment),
    ApproveExpense(ApproveExpense),
    FundCapitalCall(FundCapitalCallPayload),
    PublishNav(PublishNav),
}

/// The record a command created or updated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandRecord {
    CapitalCall(FundCapitalCall),
    Distribution(FundDistribution),
    Expense(FundExpense),
    NavReport(NavReport),
    Commitment(FundCommitment),
}

impl CommandRecord {
    /// Identifier of the affected record
    pub fn id(&self) -> &str {
        match self {
            CommandRecord::CapitalCall(call) => call.id.as_str(),
            CommandRecord::Distribution(distribution) => distribution.id.as_str(),
            CommandRecord::Expense(expense) => expense.id.as_str(),
            CommandRecord::NavReport(report) => report.id.as_str(),
            CommandRecord::Commitment(commitment) => commitment.id.as_str(),
        }
    }
}

fn parse_payload<T>(action: ActionKind, data: serde_json::Value) -> Result<T, FundError>
where
    T: DeserializeOwned + Validate,
{
    let payload: T = serde_json::from_value(data)
        .map_err(|e| FundError::invalid_command(format!("Invalid {} payload: {}", action, e)))?;
    payload
        .validate()
        .map_err(|e| FundError::invalid_command(format!("Invalid {} payload: {}", action, e)))?;
    Ok(payload)
}

fn require_fund<'a>(dataset: &'a FundOperationsDataset, id: &FundId) -> Result<&'a Fund, FundError> {
    dataset
        .fund(id)
        .ok_or_else(|| FundError::FundNotFound(id.to_string()))
}

/// Record invariants broken by caller input are the caller's mistake
fn reject_invalid(result: Result<(), FundError>) -> Result<(), FundError> {
    result.map_err(|e| match e {
        FundError::InvariantViolation(message) => FundError::InvalidCommand(message),
        other => other,
    })
}

impl FundCommand {
    /// Parses an action name and its JSON payload
    pub fn parse(action: &str, data: serde_json::Value) -> Result<Self, FundError> {
        let kind: ActionKind = action.parse()?;
        let command = match kind {
            ActionKind::CreateCapitalCall => FundCommand::CreateCapitalCall(parse_payload(kind, data)?),
            ActionKind::ProcessDistribution => {
                FundCommand::ProcessDistribution(parse_payload(kind, data)?)
            }
            ActionKind::RecordExpense => FundCommand::RecordExpense(parse_payload(kind, data)?),
            ActionKind::GenerateNav => FundCommand::GenerateNav(parse_payload(kind, data)?),
            ActionKind::AddCommitment => FundCommand::AddCommitment(parse_payload(kind, data)?),
            ActionKind::ApproveExpense => FundCommand::ApproveExpense(parse_payload(kind, data)?),
            ActionKind::FundCapitalCall => FundCommand::FundCapitalCall(parse_payload(kind, data)?),
            ActionKind::PublishNav => FundCommand::PublishNav(parse_payload(kind, data)?),
        };
        Ok(command)
    }

    pub fn action(&self) -> ActionKind {
        match self {
            FundCommand::CreateCapitalCall(_) => ActionKind::CreateCapitalCall,
            FundCommand::ProcessDistribution(_) => ActionKind::ProcessDistribution,
            FundCommand::RecordExpense(_) => ActionKind::RecordExpense,
            FundCommand::GenerateNav(_) => ActionKind::GenerateNav,
            FundCommand::AddCommitment(_) => ActionKind::AddCommitment,
            FundCommand::ApproveExpense(_) => ActionKind::ApproveExpense,
            FundCommand::FundCapitalCall(_) => ActionKind::FundCapitalCall,
            FundCommand::PublishNav(_) => ActionKind::PublishNav,
        }
    }

    /// Builds the record this command produces against `dataset`, without mutating it
    pub fn plan(
        &self,
        dataset: &FundOperationsDataset,
        now: DateTime<Utc>,
    ) -> Result<CommandRecord, FundError> {
        let today = now.date_naive();

        match self {
            FundCommand::CreateCapitalCall(data) => {
                require_fund(dataset, &data.fund_id)?;
                let call_date = data.call_date.unwrap_or(today);
                if data.due_date < call_date {
                    return Err(FundError::invalid_command("dueDate must not precede callDate"));
                }
                let total_investors = dataset
                    .commitments
                    .iter()
                    .filter(|c| c.fund_id == data.fund_id && c.status == CommitmentStatus::Active)
                    .count();

                Ok(CommandRecord::CapitalCall(FundCapitalCall {
                    id: CapitalCallId::generate(),
                    fund_id: data.fund_id.clone(),
                    call_number: data.call_number,
                    call_date,
                    due_date: data.due_date,
                    total_call_amount: data.amount,
                    purpose: data
                        .purpose
                        .clone()
                        .unwrap_or_else(|| format!("Capital call {}", data.call_number)),
                    status: CapitalCallStatus::Issued,
                    total_funded: Decimal::ZERO,
                    total_outstanding: data.amount,
                    investors_acknowledged: 0,
                    total_investors: u32::try_from(total_investors).unwrap_or(u32::MAX),
                    funded_at: None,
                }))
            }

            FundCommand::ProcessDistribution(data) => {
                require_fund(dataset, &data.fund_id)?;
                let components = [
                    data.return_of_capital,
                    data.capital_gains,
                    data.dividend_income,
                    data.interest_income,
                ];
                // An unbroken-down payout is treated as return of capital
                let return_of_capital = if components.iter().all(Option::is_none) {
                    data.amount
                } else {
                    data.return_of_capital.unwrap_or_default()
                };

                let distribution = FundDistribution {
                    id: DistributionId::generate(),
                    fund_id: data.fund_id.clone(),
                    distribution_number: data.distribution_number,
                    distribution_date: data.distribution_date,
                    distribution_type: data.distribution_type.unwrap_or(DistributionType::Cash),
                    total_amount: data.amount,
                    return_of_capital,
                    capital_gains: data.capital_gains.unwrap_or_default(),
                    dividend_income: data.dividend_income.unwrap_or_default(),
                    interest_income: data.interest_income.unwrap_or_default(),
                    carried_interest: data.carried_interest.unwrap_or_default(),
                    tax_withholding: data.tax_withholding.unwrap_or_default(),
                    status: DistributionStatus::Processing,
                };
                reject_invalid(distribution.validate())?;
                Ok(CommandRecord::Distribution(distribution))
            }

            FundCommand::RecordExpense(data) => {
                require_fund(dataset, &data.fund_id)?;
                Ok(CommandRecord::Expense(FundExpense {
                    id: ExpenseId::generate(),
                    fund_id: data.fund_id.clone(),
                    expense_date: data.expense_date.unwrap_or(today),
                    category: data.category,
                    expense_type: data.expense_type.unwrap_or(ExpenseType::FundExpense),
                    amount: data.amount,
                    description: data.description.clone(),
                    vendor: data.vendor.clone(),
                    status: ExpenseStatus::Pending,
                    approved_by: None,
                    approved_at: None,
                }))
            }

            FundCommand::GenerateNav(data) => {
                require_fund(dataset, &data.fund_id)?;
                let report = NavReport {
                    id: NavReportId::generate(),
                    fund_id: data.fund_id.clone(),
                    reporting_period: data.reporting_period.clone(),
                    as_of_date: data.as_of_date,
                    total_nav: data.total_assets - data.total_liabilities,
                    nav_per_unit: data.nav_per_unit,
                    total_assets: data.total_assets,
                    total_liabilities: data.total_liabilities,
                    unrealized_gains: data.unrealized_gains.unwrap_or_default(),
                    realized_gains: data.realized_gains.unwrap_or_default(),
                    status: NavReportStatus::Draft,
                    published_at: None,
                };
                reject_invalid(report.validate())?;
                Ok(CommandRecord::NavReport(report))
            }

            FundCommand::AddCommitment(data) => {
                let fund = require_fund(dataset, &data.fund_id)?;
                if matches!(fund.status, FundStatus::Liquidating | FundStatus::Closed) {
                    return Err(FundError::invalid_command(format!(
                        "Fund {} is not accepting commitments",
                        fund.id
                    )));
                }
                Ok(CommandRecord::Commitment(FundCommitment {
                    id: CommitmentId::generate(),
                    fund_id: data.fund_id.clone(),
                    investor_id: data.investor_id.clone(),
                    investor_name: data.investor_name.clone(),
                    investor_type: data.investor_type.unwrap_or(InvestorType::Other),
                    commitment_amount: data.commitment_amount,
                    commitment_date: data.commitment_date.unwrap_or(today),
                    called_amount: Decimal::ZERO,
                    distributed_amount: Decimal::ZERO,
                    current_nav: Decimal::ZERO,
                    status: CommitmentStatus::Active,
                }))
            }

            FundCommand::ApproveExpense(data) => {
                let mut expense = dataset
                    .expenses
                    .iter()
                    .find(|e| e.id == data.expense_id)
                    .cloned()
                    .ok_or_else(|| FundError::record_not_found("Expense", &data.expense_id))?;
                expense.approve(data.approved_by.clone(), now)?;
                Ok(CommandRecord::Expense(expense))
            }

            FundCommand::FundCapitalCall(data) => {
                let mut call = dataset
                    .capital_calls
                    .iter()
                    .find(|c| c.id == data.capital_call_id)
                    .cloned()
                    .ok_or_else(|| FundError::record_not_found("Capital call", &data.capital_call_id))?;
                call.mark_funded(now)?;
                Ok(CommandRecord::CapitalCall(call))
            }

            FundCommand::PublishNav(data) => {
                let mut report = dataset
                    .nav_reports
                    .iter()
                    .find(|n| n.id == data.nav_report_id)
                    .cloned()
                    .ok_or_else(|| FundError::record_not_found("NAV report", &data.nav_report_id))?;
                report.publish(now)?;
                Ok(CommandRecord::NavReport(report))
            }
        }
    }
}

/// What a command returns to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandAcknowledgment {
    #[serde(flatten)]
    pub record: CommandRecord,
    pub processed_at: DateTime<Utc>,
    /// Whether the record was written back to the store
    pub persisted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandReceipt {
    pub action: ActionKind,
    pub acknowledgment: CommandAcknowledgment,
}

impl CommandReceipt {
    pub fn message(&self) -> &'static str {
        self.action.success_message()
    }
}

/// Whether a successful command is written back to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandMode {
    /// Plan and commit under the write lock; later reads observe the record
    #[default]
    Persist,
    /// Plan under the read lock and only echo the record back
    Acknowledge,
}

impl CommandMode {
    pub fn persists(&self) -> bool {
        matches!(self, CommandMode::Persist)
    }
}

impl fmt::Display for CommandMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandMode::Persist => f.write_str("persist"),
            CommandMode::Acknowledge => f.write_str("acknowledge"),
        }
    }
}
