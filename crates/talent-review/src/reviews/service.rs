use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::development::DevelopmentPlan;
use super::domain::{
    AnswerSheet, CompanyId, Employee, EmployeeId, Evaluation, EvaluationKey, OverrideOutcome,
    Period, PeriodId, ReviewStatus, Role,
};
use super::gap::{self, GapReport, GapViewer};
use super::goals::{
    self, Goal, GoalKpi, KpiDraft, KpiSaveOutcome,
};
use super::questionnaire::{
    standard_questionnaire, CycleBinding, Questionnaire, QuestionnaireMode,
    QuestionnaireTemplate, ResolvedQuestionnaire,
};
use super::repository::{
    AuditAction, AuditEntry, AuditError, AuditLog, RepositoryError, ReviewStore,
};
use super::scoring;

/// Service composing the store, the audit trail, and the scoring rules.
pub struct ReviewService<S, A> {
    store: Arc<S>,
    audit: Arc<A>,
}

/// Transient-failure retry budget for store calls.
const BUSY_RETRIES: u32 = 3;
const BUSY_BACKOFF: Duration = Duration::from_millis(50);

/// Incoming evaluation payload. The service derives the score fields and the
/// snapshot; callers never supply them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDraft {
    pub company_id: CompanyId,
    pub period: PeriodId,
    pub employee_id: EmployeeId,
    pub manager_id: Option<EmployeeId>,
    pub answers: AnswerSheet,
    pub comment: String,
    pub is_self_eval: bool,
    /// Must be `Draft` or `Submitted`; the other statuses are not reachable
    /// through a save.
    pub target_status: ReviewStatus,
}

impl<S, A> ReviewService<S, A>
where
    S: ReviewStore + 'static,
    A: AuditLog + 'static,
{
    pub fn new(store: Arc<S>, audit: Arc<A>) -> Self {
        Self { store, audit }
    }

    /// Run a store call, retrying a bounded number of times on `Busy`.
    fn with_retry<T>(
        &self,
        mut call: impl FnMut(&S) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut attempt = 0;
        loop {
            match call(&self.store) {
                Err(RepositoryError::Busy) if attempt < BUSY_RETRIES => {
                    attempt += 1;
                    warn!(attempt, "store busy, retrying");
                    std::thread::sleep(BUSY_BACKOFF);
                }
                other => return other,
            }
        }
    }

    /// Resolve the question set for a period: the bound template when it has
    /// questions, otherwise the built-in standard questionnaire.
    pub fn questionnaire(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
    ) -> Result<ResolvedQuestionnaire, ReviewServiceError> {
        let binding = self.with_retry(|store| store.binding(company_id, period))?;

        if let Some(binding) = binding {
            let questions =
                self.with_retry(|store| store.template_questions(company_id, binding.template_id))?;
            let questionnaire = Questionnaire::from_questions(questions);
            if !questionnaire.is_empty() {
                return Ok(ResolvedQuestionnaire {
                    mode: QuestionnaireMode::Dynamic,
                    questionnaire,
                });
            }
            warn!(
                template_id = binding.template_id,
                "bound template has no questions, falling back to standard set"
            );
        }

        Ok(ResolvedQuestionnaire {
            mode: QuestionnaireMode::Standard,
            questionnaire: standard_questionnaire(),
        })
    }

    /// Bind a questionnaire template to a period, replacing any previous
    /// binding.
    pub fn bind_template(&self, binding: CycleBinding) -> Result<(), ReviewServiceError> {
        self.with_retry(|store| store.bind_template(binding.clone()))?;
        Ok(())
    }

    pub fn templates(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<QuestionnaireTemplate>, ReviewServiceError> {
        Ok(self.with_retry(|store| store.templates(company_id))?)
    }

    pub fn save_template(
        &self,
        template: QuestionnaireTemplate,
    ) -> Result<(), ReviewServiceError> {
        self.with_retry(|store| store.upsert_template(template.clone()))?;
        Ok(())
    }

    /// Save an evaluation as one atomic upsert by its natural key. Scores and
    /// category are recomputed from the answers on every save; the employee
    /// snapshot is captured on the first save and preserved by the store on
    /// every later one, so concurrent saves on the same key collapse into a
    /// single row whichever order they land in.
    ///
    /// Locking is enforced by the caller: the service applies whatever it is
    /// given, so the admin override can reuse this path.
    pub fn save_evaluation(
        &self,
        draft: EvaluationDraft,
    ) -> Result<Evaluation, ReviewServiceError> {
        if !matches!(draft.target_status, ReviewStatus::Draft | ReviewStatus::Submitted) {
            return Err(ReviewServiceError::InvalidTargetStatus(
                draft.target_status.label(),
            ));
        }

        let employee = self
            .with_retry(|store| store.employee(draft.company_id, &draft.employee_id))?
            .ok_or_else(|| ReviewServiceError::EmployeeNotFound(draft.employee_id.clone()))?;

        let resolved = self.questionnaire(draft.company_id, &draft.period)?;
        let summary = scoring::score_answers(&resolved.questionnaire, &draft.answers);

        let key = EvaluationKey {
            company_id: draft.company_id,
            period: draft.period.clone(),
            employee_id: draft.employee_id.clone(),
            is_self_eval: draft.is_self_eval,
        };

        let evaluation = Evaluation {
            key,
            snapshot: employee.snapshot(),
            manager_id: draft.manager_id.clone(),
            avg_performance: summary.avg_performance,
            avg_potential: summary.avg_potential,
            category: summary.category,
            comment: draft.comment,
            answers: draft.answers,
            status: draft.target_status,
            last_modified: today(),
        };

        Ok(self.with_retry(|store| store.upsert_evaluation(evaluation.clone()))?)
    }

    pub fn evaluation(
        &self,
        key: &EvaluationKey,
    ) -> Result<Option<Evaluation>, ReviewServiceError> {
        Ok(self.with_retry(|store| store.evaluation(key))?)
    }

    /// Self versus manager comparison for one employee and period, subject to
    /// the viewer's disclosure rule.
    pub fn gap_analysis(
        &self,
        viewer: GapViewer,
        company_id: CompanyId,
        period: &PeriodId,
        employee_id: &EmployeeId,
    ) -> Result<GapReport, ReviewServiceError> {
        let self_key = EvaluationKey {
            company_id,
            period: period.clone(),
            employee_id: employee_id.clone(),
            is_self_eval: true,
        };
        let manager_key = EvaluationKey {
            is_self_eval: false,
            ..self_key.clone()
        };

        let self_eval = self.with_retry(|store| store.evaluation(&self_key))?;
        let manager_eval = self.with_retry(|store| store.evaluation(&manager_key))?;

        if !gap::gap_visible(viewer, self_eval.as_ref(), manager_eval.as_ref()) {
            return Err(ReviewServiceError::GapNotAvailable);
        }

        let resolved = self.questionnaire(company_id, period)?;
        let empty = AnswerSheet::new();
        let self_answers = self_eval
            .as_ref()
            .map(|eval| &eval.answers)
            .unwrap_or(&empty);
        let manager_answers = manager_eval
            .as_ref()
            .map(|eval| &eval.answers)
            .unwrap_or(&empty);

        Ok(GapReport {
            entries: gap::compare(&resolved.questionnaire, self_answers, manager_answers),
            self_avg_performance: self_eval
                .as_ref()
                .map(|eval| eval.avg_performance)
                .unwrap_or(0.0),
            self_avg_potential: self_eval
                .as_ref()
                .map(|eval| eval.avg_potential)
                .unwrap_or(0.0),
            manager_avg_performance: manager_eval
                .as_ref()
                .map(|eval| eval.avg_performance)
                .unwrap_or(0.0),
            manager_avg_potential: manager_eval
                .as_ref()
                .map(|eval| eval.avg_potential)
                .unwrap_or(0.0),
        })
    }

    /// Create a goal. The store assigns the id.
    pub fn create_goal(&self, goal: Goal) -> Result<Goal, ReviewServiceError> {
        Ok(self.with_retry(|store| store.insert_goal(goal.clone()))?)
    }

    pub fn update_goal(&self, goal: Goal) -> Result<(), ReviewServiceError> {
        self.with_retry(|store| store.update_goal(goal.clone()))?;
        Ok(())
    }

    /// Delete a goal together with its KPIs.
    pub fn delete_goal(
        &self,
        company_id: CompanyId,
        goal_id: i64,
    ) -> Result<(), ReviewServiceError> {
        self.with_retry(|store| store.delete_goal(company_id, goal_id))?;
        Ok(())
    }

    pub fn goals_for(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Goal>, ReviewServiceError> {
        Ok(self.with_retry(|store| store.goals_for(company_id, period, employee_id))?)
    }

    pub fn kpis_for(
        &self,
        company_id: CompanyId,
        goal_id: i64,
    ) -> Result<Vec<GoalKpi>, ReviewServiceError> {
        Ok(self.with_retry(|store| store.kpis_for(company_id, goal_id))?)
    }

    /// Advisory check that an employee's goal weights for a period add up to
    /// 100. Surfaced to the manager next to the goal list, never blocking.
    pub fn goal_weight_warning(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
        employee_id: &EmployeeId,
    ) -> Result<Option<String>, ReviewServiceError> {
        let goals = self.goals_for(company_id, period, employee_id)?;
        Ok(goals::goal_weight_warning(&goals))
    }

    /// Replace a goal's KPI set. Blank rows are dropped, percent progress
    /// values are stored as submitted, and the goal progress is recomputed in
    /// the same store transaction. Imbalanced weights produce a warning,
    /// never a failure.
    pub fn save_goal_kpis(
        &self,
        company_id: CompanyId,
        goal_id: i64,
        drafts: Vec<KpiDraft>,
    ) -> Result<KpiSaveOutcome, ReviewServiceError> {
        let kpis: Vec<GoalKpi> = drafts
            .into_iter()
            .filter(|draft| !draft.description.trim().is_empty())
            .map(|draft| GoalKpi {
                goal_id,
                description: draft.description,
                weight: draft.weight,
                progress: if draft.progress.is_finite() {
                    draft.progress
                } else {
                    0.0
                },
            })
            .collect();

        let progress = goals::weighted_progress(&kpis);
        let weight_total = goals::weight_total(&kpis);
        let warning = if kpis.is_empty() {
            None
        } else {
            goals::weight_warning(weight_total)
        };
        if let Some(message) = &warning {
            warn!(goal_id, %message, "saving KPIs with imbalanced weights");
        }

        self.with_retry(|store| {
            store.replace_kpis(company_id, goal_id, kpis.clone(), progress)
        })?;

        Ok(KpiSaveOutcome {
            progress,
            weight_total,
            warning,
        })
    }

    /// Save (replace) a development plan.
    pub fn save_development_plan(
        &self,
        plan: DevelopmentPlan,
    ) -> Result<(), ReviewServiceError> {
        self.with_retry(|store| store.replace_development_plan(plan.clone()))?;
        Ok(())
    }

    /// Fetch a development plan, hiding manager drafts from the employee.
    pub fn development_plan(
        &self,
        viewer: GapViewer,
        company_id: CompanyId,
        period: &PeriodId,
        employee_id: &EmployeeId,
    ) -> Result<Option<DevelopmentPlan>, ReviewServiceError> {
        let plan =
            self.with_retry(|store| store.development_plan(company_id, period, employee_id))?;
        Ok(match (viewer, plan) {
            (GapViewer::Employee, Some(plan)) if !plan.status.visible_to_employee() => None,
            (_, plan) => plan,
        })
    }

    /// Register or update an employee. An employee listed as their own
    /// manager is rejected before anything is written.
    pub fn register_employee(&self, employee: Employee) -> Result<(), ReviewServiceError> {
        if employee.manager_id.as_ref() == Some(&employee.id) {
            return Err(ReviewServiceError::SelfManagedEmployee(employee.id));
        }
        self.with_retry(|store| store.upsert_employee(employee.clone()))?;
        Ok(())
    }

    pub fn employee(
        &self,
        company_id: CompanyId,
        id: &EmployeeId,
    ) -> Result<Option<Employee>, ReviewServiceError> {
        Ok(self.with_retry(|store| store.employee(company_id, id))?)
    }

    pub fn employees(&self, company_id: CompanyId) -> Result<Vec<Employee>, ReviewServiceError> {
        Ok(self.with_retry(|store| store.employees(company_id))?)
    }

    /// Active direct reports of a manager.
    pub fn team(
        &self,
        company_id: CompanyId,
        manager_id: &EmployeeId,
    ) -> Result<Vec<Employee>, ReviewServiceError> {
        Ok(self.with_retry(|store| store.team(company_id, manager_id))?)
    }

    pub fn deactivate_employee(
        &self,
        company_id: CompanyId,
        id: &EmployeeId,
    ) -> Result<(), ReviewServiceError> {
        self.with_retry(|store| store.deactivate_employee(company_id, id))?;
        Ok(())
    }

    pub fn remove_employee(
        &self,
        company_id: CompanyId,
        id: &EmployeeId,
    ) -> Result<(), ReviewServiceError> {
        self.with_retry(|store| store.remove_employee(company_id, id))?;
        Ok(())
    }

    pub fn periods(&self, company_id: CompanyId) -> Result<Vec<Period>, ReviewServiceError> {
        Ok(self.with_retry(|store| store.periods(company_id))?)
    }

    pub fn active_period(
        &self,
        company_id: CompanyId,
    ) -> Result<Option<Period>, ReviewServiceError> {
        Ok(self.with_retry(|store| store.active_period(company_id))?)
    }

    pub fn create_period(&self, period: Period) -> Result<(), ReviewServiceError> {
        self.with_retry(|store| store.upsert_period(period.clone()))?;
        Ok(())
    }

    /// Delete a period. The active period is protected; deactivate it by
    /// activating another one first.
    pub fn delete_period(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
    ) -> Result<(), ReviewServiceError> {
        let active = self.with_retry(|store| store.active_period(company_id))?;
        if active.as_ref().is_some_and(|current| current.id == *period) {
            return Err(ReviewServiceError::ActivePeriodDeletion(period.clone()));
        }
        self.with_retry(|store| store.delete_period(company_id, period))?;
        Ok(())
    }

    /// Make one period the company's active period, deactivating all others
    /// atomically, and record who did it.
    pub fn activate_period(
        &self,
        actor: &EmployeeId,
        company_id: CompanyId,
        period: &PeriodId,
    ) -> Result<(), ReviewServiceError> {
        self.with_retry(|store| store.set_active_period(company_id, period))?;
        self.audit.append(AuditEntry {
            timestamp: Local::now().naive_local(),
            actor: actor.clone(),
            action: AuditAction::PeriodActivated,
            details: format!("period '{}' activated", period.0),
            company_id,
        })?;
        Ok(())
    }

    /// Admin override: return a Submitted evaluation to Draft so it can be
    /// corrected. Restricted to HR and super admin, requires a justification,
    /// and writes exactly one audit entry per unlock. An evaluation that is
    /// not locked is left untouched and nothing is logged.
    pub fn unlock_evaluation(
        &self,
        actor: &EmployeeId,
        actor_role: Role,
        key: &EvaluationKey,
        justification: &str,
    ) -> Result<OverrideOutcome, ReviewServiceError> {
        if !actor_role.can_override_locks() {
            return Err(ReviewServiceError::Forbidden(actor_role));
        }
        if justification.trim().is_empty() {
            return Err(ReviewServiceError::JustificationRequired);
        }

        let mut evaluation = self
            .with_retry(|store| store.evaluation(key))?
            .ok_or(RepositoryError::NotFound)?;

        if !evaluation.status.is_locked() {
            return Ok(OverrideOutcome::NotLocked);
        }

        evaluation.status = ReviewStatus::Draft;
        evaluation.last_modified = today();
        self.with_retry(|store| store.upsert_evaluation(evaluation.clone()))?;

        self.audit.append(AuditEntry {
            timestamp: Local::now().naive_local(),
            actor: actor.clone(),
            action: AuditAction::EvaluationUnlocked,
            details: format!(
                "evaluation of '{}' in period '{}' returned to draft: {}",
                key.employee_id.0,
                key.period.0,
                justification.trim()
            ),
            company_id: key.company_id,
        })?;

        Ok(OverrideOutcome::Unlocked)
    }

    /// Manager evaluations of one employee across periods, oldest first.
    pub fn score_history(
        &self,
        company_id: CompanyId,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Evaluation>, ReviewServiceError> {
        Ok(self.with_retry(|store| store.evaluation_history(company_id, employee_id))?)
    }

    /// Manager evaluations for one period, for the dashboard roll-ups.
    pub fn manager_evaluations(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
    ) -> Result<Vec<Evaluation>, ReviewServiceError> {
        Ok(self.with_retry(|store| store.evaluations_for_period(company_id, period, false))?)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Audit(#[from] AuditError),
    #[error("employee '{}' not found", .0 .0)]
    EmployeeNotFound(EmployeeId),
    #[error("employee '{}' cannot be their own manager", .0 .0)]
    SelfManagedEmployee(EmployeeId),
    #[error("a justification is required to unlock an evaluation")]
    JustificationRequired,
    #[error("role '{}' may not unlock evaluations", .0.label())]
    Forbidden(Role),
    #[error("gap analysis is not available yet")]
    GapNotAvailable,
    #[error("evaluations can only be saved as draft or submitted, not {0}")]
    InvalidTargetStatus(&'static str),
    #[error("period '{}' is active and cannot be deleted", .0 .0)]
    ActivePeriodDeletion(PeriodId),
}
