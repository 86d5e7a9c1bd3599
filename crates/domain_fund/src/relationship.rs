//! Investor relationship intelligence
//!
//! Deterministic scores computed from an investor's commitments. All
//! functions are pure and every score is a `Decimal` in `[0, 100]` rounded
//! to two places, so the same snapshot always produces the same profile.
//!
//! | Score  | Component                                  | Weight |
//! |--------|--------------------------------------------|--------|
//! | health | funding reliability (non-defaulted share)  | 35 %   |
//! | health | realized returns (DPI, capped at 1.5x)     | 25 %   |
//! | health | breadth (distinct funds, capped at 4)      | 20 %   |
//! | health | standing (share of ACTIVE commitments)     | 20 %   |
//! | risk   | unfunded exposure ratio                    | 40 %   |
//! | risk   | concentration (largest commitment share)   | 30 %   |
//! | risk   | defaulted or transferred share             | 30 %   |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use core_kernel::InvestorId;

use crate::commitment::{CommitmentStatus, FundCommitment, InvestorType};

/// Version tag carried by every profile so consumers can tell score models apart
pub const MODEL_VERSION: &str = "relationship-v1";

const DPI_CAP: Decimal = dec!(1.5);
const BREADTH_CAP: usize = 4;
const CONFIDENCE_CAP: usize = 5;
const HUNDRED: Decimal = dec!(100);

/// One investor's commitments across the portfolio
#[derive(Debug, Clone, PartialEq)]
pub struct InvestorSnapshot {
    pub investor_id: InvestorId,
    pub investor_name: String,
    pub investor_type: InvestorType,
    pub commitments: Vec<FundCommitment>,
}

impl InvestorSnapshot {
    /// Groups commitments by investor, ordered by investor id
    pub fn group(commitments: &[FundCommitment]) -> Vec<InvestorSnapshot> {
        let mut by_investor: BTreeMap<&str, InvestorSnapshot> = BTreeMap::new();
        for commitment in commitments {
            by_investor
                .entry(commitment.investor_id.as_str())
                .or_insert_with(|| InvestorSnapshot {
                    investor_id: commitment.investor_id.clone(),
                    investor_name: commitment.investor_name.clone(),
                    investor_type: commitment.investor_type,
                    commitments: Vec::new(),
                })
                .commitments
                .push(commitment.clone());
        }
        by_investor.into_values().collect()
    }

    pub fn total_committed(&self) -> Decimal {
        self.commitments.iter().map(|c| c.commitment_amount).sum()
    }

    pub fn total_called(&self) -> Decimal {
        self.commitments.iter().map(|c| c.called_amount).sum()
    }

    pub fn total_distributed(&self) -> Decimal {
        self.commitments.iter().map(|c| c.distributed_amount).sum()
    }

    pub fn total_nav(&self) -> Decimal {
        self.commitments.iter().map(|c| c.current_nav).sum()
    }

    pub fn unfunded(&self) -> Decimal {
        self.commitments.iter().map(|c| c.unfunded_commitment()).sum()
    }

    pub fn fund_count(&self) -> usize {
        self.commitments
            .iter()
            .map(|c| c.fund_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Distributions over paid-in capital
    pub fn dpi(&self) -> Decimal {
        ratio(self.total_distributed(), self.total_called())
    }

    /// Total value (distributions plus NAV) over paid-in capital
    pub fn tvpi(&self) -> Decimal {
        ratio(self.total_distributed() + self.total_nav(), self.total_called())
    }

    fn count_where(&self, predicate: impl Fn(&FundCommitment) -> bool) -> usize {
        self.commitments.iter().filter(|c| predicate(c)).count()
    }
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

fn share(part: usize, whole: usize) -> Decimal {
    ratio(Decimal::from(part), Decimal::from(whole))
}

fn unit(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE)
}

fn to_score(weighted: Decimal) -> Decimal {
    (weighted * HUNDRED).clamp(Decimal::ZERO, HUNDRED).round_dp(2)
}

/// Relationship health, higher is better
pub fn health_score(snapshot: &InvestorSnapshot) -> Decimal {
    if snapshot.commitments.is_empty() {
        return Decimal::ZERO;
    }

    let defaulted: Decimal = snapshot
        .commitments
        .iter()
        .filter(|c| c.status == CommitmentStatus::Defaulted)
        .map(|c| c.commitment_amount)
        .sum();
    let reliability = unit(Decimal::ONE - ratio(defaulted, snapshot.total_committed()));
    let returns = unit(snapshot.dpi().min(DPI_CAP) / DPI_CAP);
    let breadth = share(snapshot.fund_count().min(BREADTH_CAP), BREADTH_CAP);
    let standing = share(
        snapshot.count_where(|c| c.status == CommitmentStatus::Active),
        snapshot.commitments.len(),
    );

    to_score(
        dec!(0.35) * reliability + dec!(0.25) * returns + dec!(0.20) * breadth + dec!(0.20) * standing,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn from_score(score: Decimal) -> Self {
        if score < dec!(35) {
            RiskBand::Low
        } else if score < dec!(65) {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }
}

/// Exposure risk, higher is riskier
pub fn risk_score(snapshot: &InvestorSnapshot) -> Decimal {
    if snapshot.commitments.is_empty() {
        return Decimal::ZERO;
    }

    let committed = snapshot.total_committed();
    let exposure = unit(ratio(snapshot.unfunded(), committed));
    let largest = snapshot
        .commitments
        .iter()
        .map(|c| c.commitment_amount)
        .max()
        .unwrap_or_default();
    let concentration = unit(ratio(largest, committed));
    let troubled = share(
        snapshot.count_where(|c| {
            matches!(c.status, CommitmentStatus::Defaulted | CommitmentStatus::Transferred)
        }),
        snapshot.commitments.len(),
    );

    to_score(dec!(0.40) * exposure + dec!(0.30) * concentration + dec!(0.30) * troubled)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentPrediction {
    pub predicted_amount: Decimal,
    /// 0-100, grows with the number of observed commitments
    pub confidence: Decimal,
    pub basis_count: usize,
}

/// Expected size of the investor's next commitment
pub fn predict_next_commitment(snapshot: &InvestorSnapshot, health: Decimal) -> CommitmentPrediction {
    let count = snapshot.commitments.len();
    let average = ratio(snapshot.total_committed(), Decimal::from(count));
    let multiplier = dec!(0.75) + health.clamp(Decimal::ZERO, HUNDRED) / dec!(200);

    CommitmentPrediction {
        predicted_amount: (average * multiplier).round_dp(2),
        confidence: to_score(share(count.min(CONFIDENCE_CAP), CONFIDENCE_CAP)),
        basis_count: count,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    pub investor_tvpi: Decimal,
    pub portfolio_tvpi: Decimal,
    /// Investor TVPI less portfolio TVPI
    pub spread: Decimal,
    /// Share of investors with a strictly lower TVPI
    pub percentile: Decimal,
}

/// Compares an investor's TVPI with the whole book
pub fn benchmark(snapshot: &InvestorSnapshot, portfolio: &[InvestorSnapshot]) -> Benchmark {
    let called: Decimal = portfolio.iter().map(InvestorSnapshot::total_called).sum();
    let value: Decimal = portfolio
        .iter()
        .map(|s| s.total_distributed() + s.total_nav())
        .sum();
    let investor_tvpi = snapshot.tvpi();
    let portfolio_tvpi = ratio(value, called);
    let below = portfolio.iter().filter(|s| s.tvpi() < investor_tvpi).count();

    Benchmark {
        investor_tvpi: investor_tvpi.round_dp(2),
        portfolio_tvpi: portfolio_tvpi.round_dp(2),
        spread: (investor_tvpi - portfolio_tvpi).round_dp(2),
        percentile: to_score(share(below, portfolio.len())),
    }
}

/// Everything known about one investor relationship
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipProfile {
    pub investor_id: InvestorId,
    pub investor_name: String,
    pub investor_type: InvestorType,
    pub fund_count: usize,
    pub total_committed: Decimal,
    pub total_called: Decimal,
    pub total_distributed: Decimal,
    pub health_score: Decimal,
    pub risk_score: Decimal,
    pub risk_band: RiskBand,
    pub next_commitment: CommitmentPrediction,
    pub benchmark: Benchmark,
    pub model_version: &'static str,
}

pub fn profile(snapshot: &InvestorSnapshot, portfolio: &[InvestorSnapshot]) -> RelationshipProfile {
    let health = health_score(snapshot);
    let risk = risk_score(snapshot);

    RelationshipProfile {
        investor_id: snapshot.investor_id.clone(),
        investor_name: snapshot.investor_name.clone(),
        investor_type: snapshot.investor_type,
        fund_count: snapshot.fund_count(),
        total_committed: snapshot.total_committed(),
        total_called: snapshot.total_called(),
        total_distributed: snapshot.total_distributed(),
        health_score: health,
        risk_score: risk,
        risk_band: RiskBand::from_score(risk),
        next_commitment: predict_next_commitment(snapshot, health),
        benchmark: benchmark(snapshot, portfolio),
        model_version: MODEL_VERSION,
    }
}

/// Profiles for every investor, healthiest first
pub fn profiles(commitments: &[FundCommitment]) -> Vec<RelationshipProfile> {
    let portfolio = InvestorSnapshot::group(commitments);
    let mut profiles: Vec<_> = portfolio.iter().map(|s| profile(s, &portfolio)).collect();
    profiles.sort_by(|a, b| {
        b.health_score
            .cmp(&a.health_score)
            .then_with(|| a.investor_id.as_str().cmp(b.investor_id.as_str()))
    });
    profiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::FundOperationsDataset;

    fn portfolio() -> Vec<InvestorSnapshot> {
        InvestorSnapshot::group(&FundOperationsDataset::bundled().unwrap().commitments)
    }

    fn snapshot(id: &str) -> InvestorSnapshot {
        portfolio().into_iter().find(|s| s.investor_id == id).unwrap()
    }

    #[test]
    fn test_grouping() {
        let portfolio = portfolio();
        assert_eq!(portfolio.len(), 5);
        assert_eq!(snapshot("investor-1").commitments.len(), 3);
        assert_eq!(snapshot("investor-1").fund_count(), 3);
    }

    #[test]
    fn test_health_of_clean_relationship() {
        // 35 + 25 * (160.6 / 137.8 / 1.5) + 15 + 20
        assert_eq!(health_score(&snapshot("investor-1")), dec!(89.42));
    }

    #[test]
    fn test_defaults_lower_health_and_raise_risk() {
        let clean = snapshot("investor-1");
        let troubled = snapshot("investor-5");

        assert!(health_score(&troubled) < health_score(&clean));
        assert!(risk_score(&troubled) > risk_score(&clean));
        assert_eq!(RiskBand::from_score(risk_score(&clean)), RiskBand::Low);
        assert_eq!(RiskBand::from_score(risk_score(&troubled)), RiskBand::Medium);
    }

    #[test]
    fn test_risk_bands() {
        assert_eq!(RiskBand::from_score(dec!(34.99)), RiskBand::Low);
        assert_eq!(RiskBand::from_score(dec!(35)), RiskBand::Medium);
        assert_eq!(RiskBand::from_score(dec!(65)), RiskBand::High);
    }

    #[test]
    fn test_prediction_scales_with_health() {
        let investor = snapshot("investor-4");
        let low = predict_next_commitment(&investor, Decimal::ZERO);
        let high = predict_next_commitment(&investor, HUNDRED);

        // average 125M, scaled 0.75x..1.25x
        assert_eq!(low.predicted_amount, dec!(93750000));
        assert_eq!(high.predicted_amount, dec!(156250000));
        assert_eq!(low.confidence, dec!(40));
    }

    #[test]
    fn test_empty_snapshot_scores_zero() {
        let empty = InvestorSnapshot {
            investor_id: InvestorId::new("investor-0"),
            investor_name: "Nobody".to_string(),
            investor_type: InvestorType::Other,
            commitments: Vec::new(),
        };
        assert_eq!(health_score(&empty), Decimal::ZERO);
        assert_eq!(risk_score(&empty), Decimal::ZERO);
        assert_eq!(predict_next_commitment(&empty, HUNDRED).predicted_amount, Decimal::ZERO);
    }

    #[test]
    fn test_profiles_sorted_by_health() {
        let profiles = profiles(&FundOperationsDataset::bundled().unwrap().commitments);
        assert_eq!(profiles.first().unwrap().investor_id, "investor-1");
        assert_eq!(profiles.last().unwrap().investor_id, "investor-5");
        assert!(profiles.windows(2).all(|w| w[0].health_score >= w[1].health_score));
        assert!(profiles.iter().all(|p| p.model_version == MODEL_VERSION));
    }

    #[test]
    fn test_benchmark_percentile() {
        let portfolio = portfolio();
        let best = portfolio
            .iter()
            .max_by(|a, b| a.tvpi().cmp(&b.tvpi()))
            .unwrap();
        let result = benchmark(best, &portfolio);
        assert_eq!(result.percentile, dec!(80));
        assert!(result.spread > Decimal::ZERO);
    }
}
