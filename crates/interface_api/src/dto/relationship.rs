//! Relationship intelligence DTOs

use serde::{Deserialize, Serialize};

use core_kernel::InvestorId;
use domain_fund::RelationshipProfile;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipQuery {
    pub investor_id: Option<InvestorId>,
}

/// Either every profile or the one requested
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RelationshipData {
    All(Vec<RelationshipProfile>),
    One(Box<RelationshipProfile>),
}
