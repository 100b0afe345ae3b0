use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::api_client::{ApplicantRequest, PredictionResult};
use crate::utils::app_paths::AppPaths;

/// One recorded submission, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub request: ApplicantRequest,
    pub success: bool,
    #[serde(default)]
    pub result: Option<PredictionResult>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HistoryEntry {
    /// One-line summary for the F3 overlay
    pub fn format_for_display(&self) -> String {
        let when = self.timestamp.format("%Y-%m-%d %H:%M");
        match (&self.result, &self.error) {
            (Some(result), _) => format!(
                "{}  income {:>10.0}  loan {:>10.0}  ->  score {} ({})",
                when,
                self.request.income,
                self.request.loan_amount,
                result.credit_score,
                result.rating.as_str()
            ),
            (None, Some(error)) => format!(
                "{}  income {:>10.0}  loan {:>10.0}  ->  failed: {}",
                when, self.request.income, self.request.loan_amount, error
            ),
            (None, None) => format!("{}  (no outcome recorded)", when),
        }
    }
}

/// Assessment history persisted as JSON in the platform data dir.
pub struct AssessmentHistory {
    entries: Vec<HistoryEntry>,
    history_file: PathBuf,
    max_entries: usize,
}

impl AssessmentHistory {
    pub fn new(max_entries: usize) -> Result<Self> {
        let history_file = AppPaths::history_file()
            .map_err(|e| anyhow::anyhow!("cannot resolve history file: {}", e))?;
        Self::with_file(history_file, max_entries)
    }

    /// Construct against an explicit file, used by tests.
    pub fn with_file(history_file: PathBuf, max_entries: usize) -> Result<Self> {
        let mut history = Self {
            entries: Vec::new(),
            history_file,
            max_entries,
        };
        history.load_from_file()?;
        Ok(history)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record_success(
        &mut self,
        request: &ApplicantRequest,
        result: &PredictionResult,
    ) -> Result<()> {
        self.push(HistoryEntry {
            timestamp: Utc::now(),
            request: request.clone(),
            success: true,
            result: Some(result.clone()),
            error: None,
        })
    }

    pub fn record_failure(&mut self, request: &ApplicantRequest, error: &str) -> Result<()> {
        self.push(HistoryEntry {
            timestamp: Utc::now(),
            request: request.clone(),
            success: false,
            result: None,
            error: Some(error.to_string()),
        })
    }

    fn push(&mut self, entry: HistoryEntry) -> Result<()> {
        self.entries.push(entry);

        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(0..excess);
        }

        self.save_to_file()
    }

    fn load_from_file(&mut self) -> Result<()> {
        if !self.history_file.exists() {
            return Ok(());
        }

        let contents = fs::read_to_string(&self.history_file)?;
        if contents.trim().is_empty() {
            return Ok(());
        }

        match serde_json::from_str(&contents) {
            Ok(entries) => self.entries = entries,
            Err(e) => {
                // A corrupt history file should not block the app
                tracing::warn!(target: "history", "discarding unreadable history: {}", e);
                self.entries = Vec::new();
            }
        }
        Ok(())
    }

    fn save_to_file(&self) -> Result<()> {
        if let Some(parent) = self.history_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.history_file, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::{LoanPurpose, LoanType, Rating, ResidenceType};
    use tempfile::TempDir;

    fn request() -> ApplicantRequest {
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

    fn result() -> PredictionResult {
        PredictionResult {
            default_probability: 0.0432,
            credit_score: 742,
            rating: Rating::Good,
            loan_to_income_ratio: 2.13,
        }
    }

    #[test]
    fn records_persist_across_reload() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("history.json");

        let mut history = AssessmentHistory::with_file(file.clone(), 10).unwrap();
        history.record_success(&request(), &result()).unwrap();
        history
            .record_failure(&request(), "connection refused")
            .unwrap();

        let reloaded = AssessmentHistory::with_file(file, 10).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.entries()[0].success);
        assert_eq!(
            reloaded.entries()[1].error.as_deref(),
            Some("connection refused")
        );
    }

    #[test]
    fn oldest_entries_are_dropped_past_cap() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("history.json");

        let mut history = AssessmentHistory::with_file(file, 3).unwrap();
        for i in 0..5u32 {
            let mut req = request();
            req.age = 20 + i;
            history.record_success(&req, &result()).unwrap();
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.entries()[0].request.age, 22);
        assert_eq!(history.entries()[2].request.age, 24);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("history.json");
        fs::write(&file, "not json at all").unwrap();

        let history = AssessmentHistory::with_file(file, 10).unwrap();
        assert!(history.is_empty());
    }
}
