use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable business identifier for an employee (the "personnel number" used as
/// the login and foreign key everywhere).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

/// Multi-tenant partition key. Every query is scoped by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanyId(pub u32);

/// Review period name, unique per company (e.g. "2026-Q1").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeriodId(pub String);

/// Roles supplied by the auth collaborator. The engine treats these as
/// already-authenticated input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    Manager,
    Hr,
    SuperAdmin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Hr => "hr",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Only HR and the super admin may run the evaluation unlock override.
    pub const fn can_override_locks(self) -> bool {
        matches!(self, Role::Hr | Role::SuperAdmin)
    }
}

/// Master directory record for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub job_title: String,
    pub department: String,
    pub manager_id: Option<EmployeeId>,
    pub is_manager: bool,
    pub active: bool,
    pub company_id: CompanyId,
}

impl Employee {
    /// Denormalized snapshot captured on the first save of an evaluation.
    pub fn snapshot(&self) -> EmployeeSnapshot {
        EmployeeSnapshot {
            full_name: self.full_name.clone(),
            job_title: self.job_title.clone(),
            department: self.department.clone(),
        }
    }
}

/// Point-in-time copy of the employee fields stored on an evaluation row so
/// historical reviews survive later renames and transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSnapshot {
    pub full_name: String,
    pub job_title: String,
    pub department: String,
}

/// Review period. At most one period is active per company; activation is an
/// atomic clear-all-then-set-one operation on the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub is_active: bool,
    pub company_id: CompanyId,
}

/// Lifecycle state of an evaluation row. `Approved` and `Archived` are
/// reserved: representable, never produced by any current flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    Draft,
    Submitted,
    Approved,
    Archived,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewStatus::Draft => "draft",
            ReviewStatus::Submitted => "submitted",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Archived => "archived",
        }
    }

    /// Submitted rows are immutable except through the admin override.
    pub const fn is_locked(self) -> bool {
        matches!(self, ReviewStatus::Submitted)
    }
}

/// 9-box talent classification derived from the two axis averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TalentCategory {
    TopTalent,
    HighPerformer,
    GrowingPotential,
    ReliableContributor,
    TalentInDevelopment,
    NeedsImprovement,
    /// Sentinel for non-numeric or missing axis inputs; never an error.
    NotApplicable,
}

impl TalentCategory {
    pub const fn label(self) -> &'static str {
        match self {
            TalentCategory::TopTalent => "Top Talent",
            TalentCategory::HighPerformer => "High Performer",
            TalentCategory::GrowingPotential => "Growing Potential",
            TalentCategory::ReliableContributor => "Reliable Contributor",
            TalentCategory::TalentInDevelopment => "Talent in Development",
            TalentCategory::NeedsImprovement => "Needs Improvement",
            TalentCategory::NotApplicable => "N/A",
        }
    }
}

/// Bounds for a single question rating.
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Raw per-question answers: question id -> integer rating 1..=5.
///
/// This is the first-class form of the persisted JSON payload. Parsing is
/// deliberately lenient (a corrupt historical blob must never block rendering
/// everyone else's data): unparsable text yields an empty sheet and
/// non-integer entries are skipped. Serialization round-trips values exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet(BTreeMap<String, u8>);

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lenient parse of a persisted payload. Never fails.
    pub fn from_json(raw: &str) -> Self {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
            return Self::default();
        };
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        let mut answers = BTreeMap::new();
        for (question_id, rating) in map {
            if let Some(rating) = rating.as_u64() {
                // A 0 would masquerade as an answer while meaning "unanswered".
                if (MIN_RATING as u64..=MAX_RATING as u64).contains(&rating) {
                    answers.insert(question_id.clone(), rating as u8);
                }
            }
        }
        Self(answers)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    /// Rating for a question, defaulting to 0 when unanswered.
    pub fn rating(&self, question_id: &str) -> u8 {
        self.0.get(question_id).copied().unwrap_or(0)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    /// Record a rating, clamped into the 1..=5 band.
    pub fn set(&mut self, question_id: impl Into<String>, rating: u8) {
        let clamped = rating.clamp(MIN_RATING, MAX_RATING);
        self.0.insert(question_id.into(), clamped);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u8)> {
        self.0.iter()
    }
}

impl FromIterator<(String, u8)> for AnswerSheet {
    fn from_iter<T: IntoIterator<Item = (String, u8)>>(iter: T) -> Self {
        let mut sheet = Self::new();
        for (question_id, rating) in iter {
            sheet.set(question_id, rating);
        }
        sheet
    }
}

/// Natural key of an evaluation row. Unique per store: a given employee has
/// at most one self-evaluation and one manager-evaluation per period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationKey {
    pub company_id: CompanyId,
    pub period: PeriodId,
    pub employee_id: EmployeeId,
    pub is_self_eval: bool,
}

/// One persisted evaluation: raw answers plus the derived score fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub key: EvaluationKey,
    pub snapshot: EmployeeSnapshot,
    pub manager_id: Option<EmployeeId>,
    pub avg_performance: f64,
    pub avg_potential: f64,
    pub category: TalentCategory,
    pub comment: String,
    pub answers: AnswerSheet,
    pub status: ReviewStatus,
    pub last_modified: NaiveDate,
}

/// Result of the admin unlock override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideOutcome {
    /// The evaluation was Submitted and has been returned to Draft.
    Unlocked,
    /// The evaluation was not Submitted; nothing was changed or logged.
    NotLocked,
}

impl OverrideOutcome {
    pub const fn message(self) -> &'static str {
        match self {
            OverrideOutcome::Unlocked => "evaluation returned to draft",
            OverrideOutcome::NotLocked => "not locked",
        }
    }
}
