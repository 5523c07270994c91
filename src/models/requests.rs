use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query for the match endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchQuery {
    #[serde(default)]
    #[serde(alias = "doctor_id", rename = "doctorId")]
    pub doctor_id: Option<String>,
}

/// Query for the shift listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftListQuery {
    #[serde(default)]
    #[serde(alias = "hospital_id", rename = "hospitalId")]
    pub hospital_id: Option<String>,
    /// Only urgent shifts starting within the configured window
    #[serde(default)]
    pub urgent: Option<bool>,
}

/// Query for the program listing: `all`, `popular`, or a category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramListQuery {
    #[serde(default)]
    pub filter: Option<String>,
}

/// Request to apply for a shift
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateApplicationRequest {
    #[validate(length(min = 1))]
    pub shift_id: String,
    #[validate(length(min = 1))]
    pub hospital_id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    #[validate(range(max = 70))]
    pub experience_years: Option<u32>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_request_requires_name() {
        let request: CreateApplicationRequest = serde_json::from_str(
            r#"{"shift_id": "s1", "hospital_id": "h1", "name": ""}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_application_request_valid() {
        let request: CreateApplicationRequest = serde_json::from_str(
            r#"{"shift_id": "s1", "hospital_id": "h1", "name": "Dr. Tanaka", "experience_years": 8}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
    }
}
