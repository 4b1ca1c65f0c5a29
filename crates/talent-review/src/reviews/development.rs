use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{CompanyId, EmployeeId, PeriodId};

/// Lifecycle of a development plan. Only `Active` and `Approved` plans are
/// shown to the employee; a `Draft` stays private to the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Draft,
    Active,
    Approved,
}

impl PlanStatus {
    pub const fn visible_to_employee(self) -> bool {
        matches!(self, PlanStatus::Active | PlanStatus::Approved)
    }
}

/// On-the-job learning item (the "70" of the 70/20/10 model).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceActivity {
    pub focus: String,
    pub activity: String,
    pub due: Option<NaiveDate>,
    /// How completion will be demonstrated.
    pub evidence: String,
}

/// Learning-from-others item (the "20").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentoringActivity {
    pub focus: String,
    pub activity: String,
    pub due: Option<NaiveDate>,
}

/// Formal training item (the "10").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationActivity {
    pub course: String,
    pub cost: String,
    pub due: Option<NaiveDate>,
}

/// Primary kind of support the manager commits to provide for the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportCategory {
    Mentoring,
    Coaching,
    TrainingBudget,
    StudyLeave,
    JobRotation,
    Equipment,
}

/// Individual development plan for one employee in one period: the manager's
/// diagnosis, the 70/20/10 action tables, and the support commitment.
/// Saving replaces the whole plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevelopmentPlan {
    pub period: PeriodId,
    pub employee_id: EmployeeId,
    pub company_id: CompanyId,
    /// What the employee is exceptional at.
    pub strengths: String,
    /// What holds the employee back or is still missing.
    pub improvement_areas: String,
    /// The position or expertise level the plan steers toward.
    pub career_goal: String,
    pub experience: Vec<ExperienceActivity>,
    pub mentoring: Vec<MentoringActivity>,
    pub education: Vec<EducationActivity>,
    pub support_category: Option<SupportCategory>,
    pub support_notes: String,
    pub status: PlanStatus,
}
