use reqwest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the applicant lives. Serialized exactly as the service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidenceType {
    Owned,
    Rented,
    Mortgage,
}

impl ResidenceType {
    pub const ALL: [ResidenceType; 3] = [
        ResidenceType::Owned,
        ResidenceType::Rented,
        ResidenceType::Mortgage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResidenceType::Owned => "Owned",
            ResidenceType::Rented => "Rented",
            ResidenceType::Mortgage => "Mortgage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanPurpose {
    Education,
    Home,
    Auto,
    Personal,
}

impl LoanPurpose {
    pub const ALL: [LoanPurpose; 4] = [
        LoanPurpose::Education,
        LoanPurpose::Home,
        LoanPurpose::Auto,
        LoanPurpose::Personal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanPurpose::Education => "Education",
            LoanPurpose::Home => "Home",
            LoanPurpose::Auto => "Auto",
            LoanPurpose::Personal => "Personal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanType {
    Secured,
    Unsecured,
}

impl LoanType {
    pub const ALL: [LoanType; 2] = [LoanType::Secured, LoanType::Unsecured];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::Secured => "Secured",
            LoanType::Unsecured => "Unsecured",
        }
    }
}

/// One loan application, fully coerced to the wire types.
///
/// Range bounds (age 18-100, tenure 1-360, accounts 1-10) are advisory
/// input hints; the service validates server-side and rejects with a
/// non-2xx status, so nothing is enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRequest {
    pub age: u32,
    pub income: f64,
    pub loan_amount: f64,
    pub loan_tenure_months: u32,
    pub avg_dpd_per_delinquency: f64,
    pub delinquency_ratio: f64,
    pub credit_utilization_ratio: f64,
    pub num_open_accounts: u32,
    pub residence_type: ResidenceType,
    pub loan_purpose: LoanPurpose,
    pub loan_type: LoanType,
}

/// Four-bucket risk rating computed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Poor,
    Average,
    Good,
    Excellent,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Poor => "Poor",
            Rating::Average => "Average",
            Rating::Good => "Good",
            Rating::Excellent => "Excellent",
        }
    }
}

/// Risk metrics returned by the service, kept verbatim from the wire.
///
/// `loan_to_income_ratio` is the server's authoritative value; the form's
/// local preview never replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub default_probability: f64,
    pub credit_score: u32,
    pub rating: Rating,
    pub loan_to_income_ratio: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub features: u32,
    pub version: String,
    pub training_method: String,
    pub score_range: String,
}

/// Failure modes of one round trip. Callers present both the same way:
/// a transient notice, then back to idle. Resubmission is the only
/// recovery.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("prediction service error: {0}")]
    Transport(String),
    #[error("unexpected response from prediction service: {0}")]
    Parse(String),
}

#[derive(Clone)]
pub struct PredictionClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl PredictionClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One-shot scoring round trip. No retry, no caching, no timeout is
    /// configured at this layer; the call blocks until the service
    /// answers or the connection fails.
    pub fn predict(&self, request: &ApplicantRequest) -> Result<PredictionResult, PredictError> {
        tracing::info!(target: "api", "POST {}/api/predict", self.base_url);

        let response = self
            .client
            .post(format!("{}/api/predict", self.base_url))
            .json(request)
            .send()
            .map_err(|e| PredictError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            tracing::warn!(target: "api", "predict returned {}: {}", status, error_text);
            return Err(PredictError::Transport(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .map_err(|e| PredictError::Transport(e.to_string()))?;
        let result: PredictionResult =
            serde_json::from_str(&body).map_err(|e| PredictError::Parse(e.to_string()))?;

        tracing::info!(
            target: "api",
            "scored: probability={:.4} score={} rating={}",
            result.default_probability,
            result.credit_score,
            result.rating.as_str()
        );
        Ok(result)
    }

    /// Liveness probe, used for the startup banner and `--health`.
    pub fn health(&self) -> Result<HealthResponse, PredictError> {
        self.get_json("/api/health")
    }

    pub fn model_info(&self) -> Result<ModelInfo, PredictError> {
        self.get_json("/api/model-info")
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, PredictError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .map_err(|e| PredictError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PredictError::Transport(format!(
                "HTTP {} from {}",
                response.status(),
                path
            )));
        }

        let body = response
            .text()
            .map_err(|e| PredictError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| PredictError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn example_request() -> ApplicantRequest {
        ApplicantRequest {
            age: 28,
            income: 1_200_000.0,
            loan_amount: 2_560_000.0,
            loan_tenure_months: 36,
            avg_dpd_per_delinquency: 20.0,
            delinquency_ratio: 30.0,
            credit_utilization_ratio: 30.0,
            num_open_accounts: 2,
            residence_type: ResidenceType::Owned,
            loan_purpose: LoanPurpose::Home,
            loan_type: LoanType::Secured,
        }
    }

    #[test]
    fn request_serializes_with_exact_wire_field_names() {
        let value = serde_json::to_value(example_request()).unwrap();
        let expected = json!({
            "age": 28,
            "income": 1200000.0,
            "loan_amount": 2560000.0,
            "loan_tenure_months": 36,
            "avg_dpd_per_delinquency": 20.0,
            "delinquency_ratio": 30.0,
            "credit_utilization_ratio": 30.0,
            "num_open_accounts": 2,
            "residence_type": "Owned",
            "loan_purpose": "Home",
            "loan_type": "Secured"
        });
        assert_eq!(value, expected);
    }

    #[test]
    fn enums_serialize_as_capitalized_names() {
        assert_eq!(
            serde_json::to_string(&ResidenceType::Mortgage).unwrap(),
            "\"Mortgage\""
        );
        assert_eq!(
            serde_json::to_string(&LoanPurpose::Education).unwrap(),
            "\"Education\""
        );
        assert_eq!(
            serde_json::to_string(&LoanType::Unsecured).unwrap(),
            "\"Unsecured\""
        );
    }

    #[test]
    fn result_deserializes_from_service_body() {
        let body = r#"{
            "default_probability": 0.0432,
            "credit_score": 742,
            "rating": "Good",
            "loan_to_income_ratio": 2.13
        }"#;
        let result: PredictionResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.credit_score, 742);
        assert_eq!(result.rating, Rating::Good);
        assert_eq!(result.loan_to_income_ratio, 2.13);
        assert!(result.default_probability >= 0.0 && result.default_probability <= 1.0);
    }

    #[test]
    fn unknown_rating_fails_to_parse() {
        let body = r#"{
            "default_probability": 0.5,
            "credit_score": 500,
            "rating": "Terrible",
            "loan_to_income_ratio": 1.0
        }"#;
        assert!(serde_json::from_str::<PredictionResult>(body).is_err());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = PredictionClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
