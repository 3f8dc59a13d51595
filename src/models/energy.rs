use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw record from the aggregate power feed. Fields are optional at the
/// wire level: entries missing either one are dropped, not failed.
#[derive(Debug, Clone, Deserialize)]
pub struct PowerRecord {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub consumption: Option<f64>,
}

/// Raw record from the appliance activity feed.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityRecord {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

/// A validated power reading with the appliance set resolved as on at
/// that instant. The sequence keeps feed order; interval allocation is
/// defined over adjacent pairs in this order.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedReading {
    pub timestamp: DateTime<Utc>,
    pub power_w: f64,
    pub active: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplianceEnergy {
    pub appliance: String,
    pub energy_wh: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsumptionResponse {
    pub appliance_consumption: Vec<ApplianceEnergy>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_record_deserializes_with_missing_fields() {
        let record: PowerRecord = serde_json::from_str(r#"{"timestamp": "2025-01-01T09:00:00Z"}"#)
            .expect("partial record should still deserialize");

        assert_eq!(record.timestamp.as_deref(), Some("2025-01-01T09:00:00Z"));
        assert_eq!(record.consumption, None);
    }

    #[test]
    fn test_activity_record_ignores_unknown_fields() {
        let record: ActivityRecord = serde_json::from_str(
            r#"{"timestamp": "2025-01-01T09:00:00Z", "action": "AC 1 Turned on", "user": "ops"}"#,
        )
        .expect("extra fields should be ignored");

        assert_eq!(record.action.as_deref(), Some("AC 1 Turned on"));
    }

    #[test]
    fn test_consumption_response_serialization() {
        let response = ConsumptionResponse {
            appliance_consumption: vec![ApplianceEnergy {
                appliance: "AC 1".to_string(),
                energy_wh: 123.45,
            }],
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("appliance_consumption"));
        assert!(json.contains("AC 1"));
        assert!(json.contains("123.45"));
    }
}
