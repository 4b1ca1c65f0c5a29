use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::development::DevelopmentPlan;
use super::domain::{
    CompanyId, Employee, EmployeeId, Evaluation, EvaluationKey, Period, PeriodId,
};
use super::goals::{Goal, GoalKpi};
use super::questionnaire::{CycleBinding, Question, QuestionnaireTemplate};

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    /// Transient contention (e.g. a write lock held by a concurrent
    /// transaction). Callers retry a bounded number of times.
    #[error("store busy")]
    Busy,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Multi-row operations (`set_active_period`, `replace_kpis`, `delete_goal`,
/// `replace_development_plan`) are single transactions: an implementation must
/// apply all of their statements or none. `upsert_evaluation` is likewise one
/// transaction covering its existence check and write.
pub trait ReviewStore: Send + Sync {
    // Employee directory.
    fn upsert_employee(&self, employee: Employee) -> Result<(), RepositoryError>;
    fn employee(
        &self,
        company_id: CompanyId,
        id: &EmployeeId,
    ) -> Result<Option<Employee>, RepositoryError>;
    fn employees(&self, company_id: CompanyId) -> Result<Vec<Employee>, RepositoryError>;
    /// Active direct reports of a manager.
    fn team(
        &self,
        company_id: CompanyId,
        manager_id: &EmployeeId,
    ) -> Result<Vec<Employee>, RepositoryError>;
    fn deactivate_employee(
        &self,
        company_id: CompanyId,
        id: &EmployeeId,
    ) -> Result<(), RepositoryError>;
    fn remove_employee(
        &self,
        company_id: CompanyId,
        id: &EmployeeId,
    ) -> Result<(), RepositoryError>;

    // Review periods.
    fn periods(&self, company_id: CompanyId) -> Result<Vec<Period>, RepositoryError>;
    fn active_period(&self, company_id: CompanyId) -> Result<Option<Period>, RepositoryError>;
    fn upsert_period(&self, period: Period) -> Result<(), RepositoryError>;
    /// Deactivate every period of the company, then activate the named one.
    /// Atomic: no observer may see zero or two active periods afterwards.
    fn set_active_period(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
    ) -> Result<(), RepositoryError>;
    fn delete_period(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
    ) -> Result<(), RepositoryError>;

    // Questionnaire templates.
    fn templates(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<QuestionnaireTemplate>, RepositoryError>;
    fn upsert_template(&self, template: QuestionnaireTemplate) -> Result<(), RepositoryError>;
    fn binding(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
    ) -> Result<Option<CycleBinding>, RepositoryError>;
    fn template_questions(
        &self,
        company_id: CompanyId,
        template_id: i64,
    ) -> Result<Vec<Question>, RepositoryError>;
    /// Replaces any previous binding for the period.
    fn bind_template(&self, binding: CycleBinding) -> Result<(), RepositoryError>;

    // Evaluations.
    fn evaluation(&self, key: &EvaluationKey) -> Result<Option<Evaluation>, RepositoryError>;
    /// Insert-or-update by natural key, atomically. A first save stores the
    /// row as given; a later save overwrites the score fields, status,
    /// comment, answers, and modified date while the snapshot and manager
    /// link stay as first inserted. Returns the row as stored. Concurrent
    /// saves on the same key serialize here, last writer wins.
    fn upsert_evaluation(&self, evaluation: Evaluation)
        -> Result<Evaluation, RepositoryError>;
    fn evaluations_for_period(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
        is_self_eval: bool,
    ) -> Result<Vec<Evaluation>, RepositoryError>;
    /// All manager evaluations of one employee across periods, oldest first.
    fn evaluation_history(
        &self,
        company_id: CompanyId,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Evaluation>, RepositoryError>;

    // Goals and KPIs.
    fn insert_goal(&self, goal: Goal) -> Result<Goal, RepositoryError>;
    fn update_goal(&self, goal: Goal) -> Result<(), RepositoryError>;
    /// Removes the goal and all of its KPIs.
    fn delete_goal(&self, company_id: CompanyId, goal_id: i64) -> Result<(), RepositoryError>;
    fn goals_for(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Goal>, RepositoryError>;
    fn kpis_for(&self, company_id: CompanyId, goal_id: i64)
        -> Result<Vec<GoalKpi>, RepositoryError>;
    /// Deletes every KPI of the goal, inserts the replacement set, and writes
    /// the recomputed progress onto the goal row, all in one transaction.
    fn replace_kpis(
        &self,
        company_id: CompanyId,
        goal_id: i64,
        kpis: Vec<GoalKpi>,
        progress: f64,
    ) -> Result<(), RepositoryError>;

    // Development plans.
    fn development_plan(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
        employee_id: &EmployeeId,
    ) -> Result<Option<DevelopmentPlan>, RepositoryError>;
    /// Replaces the whole plan for (period, employee).
    fn replace_development_plan(&self, plan: DevelopmentPlan) -> Result<(), RepositoryError>;
}

/// What an audit entry records about a privileged action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    EvaluationUnlocked,
    PeriodActivated,
}

impl AuditAction {
    pub const fn label(self) -> &'static str {
        match self {
            AuditAction::EvaluationUnlocked => "evaluation_unlocked",
            AuditAction::PeriodActivated => "period_activated",
        }
    }
}

/// One row of the privileged-action trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: NaiveDateTime,
    pub actor: EmployeeId,
    pub action: AuditAction,
    pub details: String,
    pub company_id: CompanyId,
}

/// Trait describing the append-only audit trail.
pub trait AuditLog: Send + Sync {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

/// Audit sink error.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Sink(String),
}
