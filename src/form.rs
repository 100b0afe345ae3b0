//! Applicant form state.
//!
//! Numeric fields hold raw text verbatim while editing so the user can
//! clear a field completely; coercion to the wire types happens once, at
//! the submission boundary. Out-of-range values are submitted as-is: the
//! bounds on each field are input hints, not invariants.

use crate::api_client::{ApplicantRequest, LoanPurpose, LoanType, ResidenceType};

/// Classification of one numeric field's raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    Invalid(String),
    Valid(f64),
}

impl FieldValue {
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return FieldValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => FieldValue::Valid(n),
            _ => FieldValue::Invalid(trimmed.to_string()),
        }
    }

    /// Submission-boundary coercion: Empty and Invalid both collapse to
    /// the field's default.
    pub fn coerce(&self, default: f64) -> f64 {
        match self {
            FieldValue::Valid(n) => *n,
            FieldValue::Empty | FieldValue::Invalid(_) => default,
        }
    }
}

/// The eight numeric inputs of the application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Age,
    Income,
    LoanAmount,
    LoanTenureMonths,
    AvgDpdPerDelinquency,
    DelinquencyRatio,
    CreditUtilizationRatio,
    NumOpenAccounts,
}

impl NumericField {
    pub const ALL: [NumericField; 8] = [
        NumericField::Age,
        NumericField::Income,
        NumericField::LoanAmount,
        NumericField::LoanTenureMonths,
        NumericField::AvgDpdPerDelinquency,
        NumericField::DelinquencyRatio,
        NumericField::CreditUtilizationRatio,
        NumericField::NumOpenAccounts,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NumericField::Age => "Age",
            NumericField::Income => "Annual Income",
            NumericField::LoanAmount => "Loan Amount",
            NumericField::LoanTenureMonths => "Loan Tenure (months)",
            NumericField::AvgDpdPerDelinquency => "Avg DPD per Delinquency",
            NumericField::DelinquencyRatio => "Delinquency Ratio (%)",
            NumericField::CreditUtilizationRatio => "Credit Utilization (%)",
            NumericField::NumOpenAccounts => "Open Loan Accounts",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            NumericField::Age => "e.g., 28",
            NumericField::Income => "e.g., 1200000",
            NumericField::LoanAmount => "e.g., 2560000",
            NumericField::LoanTenureMonths => "e.g., 36",
            NumericField::AvgDpdPerDelinquency => "e.g., 20",
            NumericField::DelinquencyRatio => "e.g., 30",
            NumericField::CreditUtilizationRatio => "e.g., 30",
            NumericField::NumOpenAccounts => "e.g., 2",
        }
    }

    /// Advisory range shown next to the label. Never enforced.
    pub fn bounds_hint(&self) -> Option<&'static str> {
        match self {
            NumericField::Age => Some("18-100"),
            NumericField::LoanTenureMonths => Some("1-360"),
            NumericField::DelinquencyRatio | NumericField::CreditUtilizationRatio => {
                Some("0-100")
            }
            NumericField::NumOpenAccounts => Some("1-10"),
            _ => None,
        }
    }

    fn default_value(&self) -> f64 {
        match self {
            NumericField::NumOpenAccounts => 1.0,
            _ => 0.0,
        }
    }
}

/// Mutable form state owned by the UI layer. Constructed once per screen,
/// mutated only through `set_field` and the enum setters.
#[derive(Debug, Clone)]
pub struct FormState {
    age: String,
    income: String,
    loan_amount: String,
    loan_tenure_months: String,
    avg_dpd_per_delinquency: String,
    delinquency_ratio: String,
    credit_utilization_ratio: String,
    num_open_accounts: String,
    pub residence_type: ResidenceType,
    pub loan_purpose: LoanPurpose,
    pub loan_type: LoanType,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            age: String::new(),
            income: String::new(),
            loan_amount: String::new(),
            loan_tenure_months: String::new(),
            avg_dpd_per_delinquency: String::new(),
            delinquency_ratio: String::new(),
            credit_utilization_ratio: String::new(),
            num_open_accounts: String::new(),
            residence_type: ResidenceType::Owned,
            loan_purpose: LoanPurpose::Home,
            loan_type: LoanType::Secured,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, field: NumericField) -> &str {
        match field {
            NumericField::Age => &self.age,
            NumericField::Income => &self.income,
            NumericField::LoanAmount => &self.loan_amount,
            NumericField::LoanTenureMonths => &self.loan_tenure_months,
            NumericField::AvgDpdPerDelinquency => &self.avg_dpd_per_delinquency,
            NumericField::DelinquencyRatio => &self.delinquency_ratio,
            NumericField::CreditUtilizationRatio => &self.credit_utilization_ratio,
            NumericField::NumOpenAccounts => &self.num_open_accounts,
        }
    }

    /// Store raw text verbatim. No validation at keystroke time.
    pub fn set_field(&mut self, field: NumericField, raw: String) {
        let slot = match field {
            NumericField::Age => &mut self.age,
            NumericField::Income => &mut self.income,
            NumericField::LoanAmount => &mut self.loan_amount,
            NumericField::LoanTenureMonths => &mut self.loan_tenure_months,
            NumericField::AvgDpdPerDelinquency => &mut self.avg_dpd_per_delinquency,
            NumericField::DelinquencyRatio => &mut self.delinquency_ratio,
            NumericField::CreditUtilizationRatio => &mut self.credit_utilization_ratio,
            NumericField::NumOpenAccounts => &mut self.num_open_accounts,
        };
        *slot = raw;
    }

    pub fn value(&self, field: NumericField) -> FieldValue {
        FieldValue::classify(self.raw(field))
    }

    /// Display-only loan-to-income preview, recomputed from current text.
    ///
    /// Present only while both fields parse and income is non-zero. Never
    /// sent to the service; the response carries the authoritative ratio.
    pub fn loan_to_income_preview(&self) -> Option<String> {
        let income = match self.value(NumericField::Income) {
            FieldValue::Valid(n) if n != 0.0 => n,
            _ => return None,
        };
        let loan_amount = match self.value(NumericField::LoanAmount) {
            FieldValue::Valid(n) => n,
            _ => return None,
        };
        Some(format!("{:.2}", loan_amount / income))
    }

    /// Build the wire request from current form state. Pure: identical
    /// state always produces an identical request. Unparseable or empty
    /// fields take their documented defaults; nothing is range-checked.
    pub fn build_request(&self) -> ApplicantRequest {
        ApplicantRequest {
            age: self.coerce_int(NumericField::Age),
            income: self.coerce_num(NumericField::Income),
            loan_amount: self.coerce_num(NumericField::LoanAmount),
            loan_tenure_months: self.coerce_int(NumericField::LoanTenureMonths),
            avg_dpd_per_delinquency: self.coerce_num(NumericField::AvgDpdPerDelinquency),
            delinquency_ratio: self.coerce_num(NumericField::DelinquencyRatio),
            credit_utilization_ratio: self.coerce_num(NumericField::CreditUtilizationRatio),
            num_open_accounts: self.coerce_int(NumericField::NumOpenAccounts),
            residence_type: self.residence_type,
            loan_purpose: self.loan_purpose,
            loan_type: self.loan_type,
        }
    }

    fn coerce_num(&self, field: NumericField) -> f64 {
        self.value(field).coerce(field.default_value())
    }

    /// Integral wire fields: fractional text truncates toward zero,
    /// negative text saturates to 0 through the cast.
    fn coerce_int(&self, field: NumericField) -> u32 {
        self.coerce_num(field).trunc() as u32
    }
}
