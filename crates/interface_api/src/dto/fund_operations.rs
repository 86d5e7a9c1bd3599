//! Fund operations DTOs

use serde::Deserialize;
use validator::Validate;

use core_kernel::FundId;

/// Query string of `GET /api/fund-operations`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundOperationsQuery {
    #[serde(rename = "type")]
    pub query_type: Option<String>,
    pub fund_id: Option<String>,
}

impl FundOperationsQuery {
    /// The fund filter, treating an empty value as absent
    pub fn fund_filter(&self) -> Option<FundId> {
        self.fund_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(FundId::new)
    }
}

/// Body of `POST /api/fund-operations`
#[derive(Debug, Deserialize, Validate)]
pub struct CommandRequest {
    #[validate(length(min = 1))]
    pub action: String,
    /// Record type hint sent by clients; not used for dispatch
    #[serde(rename = "type", default)]
    pub record_type: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fund_id_is_no_filter() {
        let query = FundOperationsQuery {
            query_type: Some("funds".to_string()),
            fund_id: Some(String::new()),
        };
        assert!(query.fund_filter().is_none());
    }

    #[test]
    fn test_command_request_without_data() {
        let request: CommandRequest = serde_json::from_str(r#"{"action": "publish_nav"}"#).unwrap();
        assert!(request.data.is_null());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_action_fails_validation() {
        let request: CommandRequest = serde_json::from_str(r#"{"action": ""}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
