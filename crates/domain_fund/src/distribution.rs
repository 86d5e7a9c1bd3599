//! Distributions to LPs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{DistributionId, FundId};

use crate::error::FundError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionType {
    Cash,
    /// In-kind distribution of portfolio company shares
    Stock,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionStatus {
    Processing,
    Paid,
}

/// A payout to LPs broken down by source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundDistribution {
    pub id: DistributionId,
    pub fund_id: FundId,
    pub distribution_number: u32,
    pub distribution_date: NaiveDate,
    pub distribution_type: DistributionType,
    pub total_amount: Decimal,
    pub return_of_capital: Decimal,
    pub capital_gains: Decimal,
    pub dividend_income: Decimal,
    pub interest_income: Decimal,
    /// GP carry withheld from the gross amount
    pub carried_interest: Decimal,
    pub tax_withholding: Decimal,
    pub status: DistributionStatus,
}

impl FundDistribution {
    /// Amount actually paid out to limited partners, `None` on overflow
    pub fn net_to_limited_partners(&self) -> Option<Decimal> {
        self.total_amount
            .checked_sub(self.carried_interest)?
            .checked_sub(self.tax_withholding)
    }

    /// Sum of the income components that make up the gross amount, `None` on overflow
    pub fn component_total(&self) -> Option<Decimal> {
        [
            self.return_of_capital,
            self.capital_gains,
            self.dividend_income,
            self.interest_income,
        ]
        .iter()
        .try_fold(Decimal::ZERO, |total, component| total.checked_add(*component))
    }

    pub fn validate(&self) -> Result<(), FundError> {
        let components = [
            self.return_of_capital,
            self.capital_gains,
            self.dividend_income,
            self.interest_income,
            self.carried_interest,
            self.tax_withholding,
        ];
        if components.iter().any(|c| *c < Decimal::ZERO) {
            return Err(FundError::invariant(format!(
                "distribution {} has a negative component",
                self.id
            )));
        }
        match self.component_total() {
            Some(total) if total <= self.total_amount => {}
            _ => {
                return Err(FundError::invariant(format!(
                    "distribution {} components exceed total {}",
                    self.id, self.total_amount
                )))
            }
        }
        match self.net_to_limited_partners() {
            Some(net) if net >= Decimal::ZERO => Ok(()),
            _ => Err(FundError::invariant(format!(
                "distribution {} withholds more than it distributes",
                self.id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn paid_distribution() -> FundDistribution {
        FundDistribution {
            id: DistributionId::new("dist-1"),
            fund_id: FundId::new("fund-2"),
            distribution_number: 4,
            distribution_date: NaiveDate::from_ymd_opt(2023, 11, 30).unwrap(),
            distribution_type: DistributionType::Cash,
            total_amount: dec!(40000000),
            return_of_capital: dec!(22000000),
            capital_gains: dec!(16000000),
            dividend_income: dec!(1500000),
            interest_income: dec!(500000),
            carried_interest: dec!(3200000),
            tax_withholding: dec!(400000),
            status: DistributionStatus::Paid,
        }
    }

    #[test]
    fn test_net_to_limited_partners() {
        let distribution = paid_distribution();

        assert_eq!(distribution.component_total(), Some(dec!(40000000)));
        assert_eq!(distribution.net_to_limited_partners(), Some(dec!(36400000)));
        assert!(distribution.validate().is_ok());
    }

    #[test]
    fn test_overflowing_components_fail_validation() {
        let distribution = FundDistribution {
            total_amount: dec!(1),
            return_of_capital: dec!(50000000000000000000000000000),
            capital_gains: dec!(50000000000000000000000000000),
            dividend_income: Decimal::ZERO,
            interest_income: Decimal::ZERO,
            carried_interest: Decimal::ZERO,
            tax_withholding: Decimal::ZERO,
            ..paid_distribution()
        };

        assert!(distribution.component_total().is_none());
        assert!(matches!(
            distribution.validate(),
            Err(FundError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_withholding_beyond_total_fails_validation() {
        let distribution = FundDistribution {
            carried_interest: dec!(30000000),
            tax_withholding: dec!(20000000),
            ..paid_distribution()
        };

        assert!(distribution.validate().is_err());
    }
}
