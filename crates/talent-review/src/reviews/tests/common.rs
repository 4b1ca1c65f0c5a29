use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::reviews::development::DevelopmentPlan;
use crate::reviews::domain::{
    AnswerSheet, CompanyId, Employee, EmployeeId, Evaluation, EvaluationKey, Period, PeriodId,
    ReviewStatus,
};
use crate::reviews::goals::{Goal, GoalKpi, GoalStatus};
use crate::reviews::questionnaire::{
    standard_questionnaire, CycleBinding, Question, QuestionnaireTemplate,
};
use crate::reviews::repository::{RepositoryError, ReviewStore};
use crate::reviews::service::{EvaluationDraft, ReviewService};
use crate::reviews::review_router;
use crate::reviews::store::{InMemoryAuditLog, InMemoryReviewStore};

pub(super) const COMPANY: CompanyId = CompanyId(1);

pub(super) fn period_id() -> PeriodId {
    PeriodId("2026-Q1".to_string())
}

pub(super) fn manager_id() -> EmployeeId {
    EmployeeId("1000".to_string())
}

pub(super) fn employee_id() -> EmployeeId {
    EmployeeId("1001".to_string())
}

pub(super) fn manager() -> Employee {
    Employee {
        id: manager_id(),
        full_name: "Mari Kovacs".to_string(),
        job_title: "Engineering Manager".to_string(),
        department: "Engineering".to_string(),
        manager_id: None,
        is_manager: true,
        active: true,
        company_id: COMPANY,
    }
}

pub(super) fn employee() -> Employee {
    Employee {
        id: employee_id(),
        full_name: "Denes Farkas".to_string(),
        job_title: "Software Engineer".to_string(),
        department: "Engineering".to_string(),
        manager_id: Some(manager_id()),
        is_manager: false,
        active: true,
        company_id: COMPANY,
    }
}

pub(super) fn period() -> Period {
    Period {
        id: period_id(),
        start_date: None,
        deadline: None,
        is_active: true,
        company_id: COMPANY,
    }
}

/// Answer every standard question with the same rating.
pub(super) fn uniform_answers(rating: u8) -> AnswerSheet {
    standard_questionnaire()
        .all()
        .map(|question| (question.id.clone(), rating))
        .collect()
}

pub(super) fn draft(
    employee_id: EmployeeId,
    is_self_eval: bool,
    target_status: ReviewStatus,
    answers: AnswerSheet,
) -> EvaluationDraft {
    EvaluationDraft {
        company_id: COMPANY,
        period: period_id(),
        employee_id,
        manager_id: Some(manager_id()),
        answers,
        comment: "solid quarter".to_string(),
        is_self_eval,
        target_status,
    }
}

pub(super) fn evaluation_key(employee_id: EmployeeId, is_self_eval: bool) -> EvaluationKey {
    EvaluationKey {
        company_id: COMPANY,
        period: period_id(),
        employee_id,
        is_self_eval,
    }
}

pub(super) fn goal_for(employee_id: EmployeeId) -> Goal {
    Goal {
        id: 0,
        period: period_id(),
        employee_id,
        manager_id: manager_id(),
        title: "Ship the billing migration".to_string(),
        description: "Move invoicing off the legacy pipeline".to_string(),
        weight: 40,
        progress: 0.0,
        status: GoalStatus::OnTrack,
        deadline: None,
        company_id: COMPANY,
    }
}

/// Service over fresh in-memory stores, seeded with a manager, one report,
/// and the active period.
pub(super) fn build_service() -> (
    ReviewService<InMemoryReviewStore, InMemoryAuditLog>,
    Arc<InMemoryReviewStore>,
    Arc<InMemoryAuditLog>,
) {
    let store = Arc::new(InMemoryReviewStore::new());
    let audit = Arc::new(InMemoryAuditLog::new());
    let service = ReviewService::new(store.clone(), audit.clone());
    service.register_employee(manager()).expect("seed manager");
    service.register_employee(employee()).expect("seed employee");
    service.create_period(period()).expect("seed period");
    (service, store, audit)
}

pub(super) fn review_router_with_service(
    service: ReviewService<InMemoryReviewStore, InMemoryAuditLog>,
) -> axum::Router {
    review_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store wrapper that fails a configured number of calls before delegating,
/// or stays offline for good.
pub(super) struct FlakyStore {
    inner: InMemoryReviewStore,
    busy_budget: AtomicU32,
    offline: bool,
}

impl FlakyStore {
    pub(super) fn busy(times: u32) -> Self {
        Self {
            inner: InMemoryReviewStore::new(),
            busy_budget: AtomicU32::new(times),
            offline: false,
        }
    }

    pub(super) fn offline() -> Self {
        Self {
            inner: InMemoryReviewStore::new(),
            busy_budget: AtomicU32::new(0),
            offline: true,
        }
    }

    pub(super) fn seed(&self) {
        self.inner.upsert_employee(manager()).expect("seed manager");
        self.inner
            .upsert_employee(employee())
            .expect("seed employee");
        self.inner.upsert_period(period()).expect("seed period");
    }

    fn gate(&self) -> Result<(), RepositoryError> {
        if self.offline {
            return Err(RepositoryError::Unavailable("store offline".to_string()));
        }
        let remaining = self.busy_budget.load(Ordering::SeqCst);
        if remaining > 0 {
            self.busy_budget.store(remaining - 1, Ordering::SeqCst);
            return Err(RepositoryError::Busy);
        }
        Ok(())
    }
}

impl ReviewStore for FlakyStore {
    fn upsert_employee(&self, employee: Employee) -> Result<(), RepositoryError> {
        self.gate()?;
        self.inner.upsert_employee(employee)
    }

    fn employee(
        &self,
        company_id: CompanyId,
        id: &EmployeeId,
    ) -> Result<Option<Employee>, RepositoryError> {
        self.gate()?;
        self.inner.employee(company_id, id)
    }

    fn employees(&self, company_id: CompanyId) -> Result<Vec<Employee>, RepositoryError> {
        self.gate()?;
        self.inner.employees(company_id)
    }

    fn team(
        &self,
        company_id: CompanyId,
        manager_id: &EmployeeId,
    ) -> Result<Vec<Employee>, RepositoryError> {
        self.gate()?;
        self.inner.team(company_id, manager_id)
    }

    fn deactivate_employee(
        &self,
        company_id: CompanyId,
        id: &EmployeeId,
    ) -> Result<(), RepositoryError> {
        self.gate()?;
        self.inner.deactivate_employee(company_id, id)
    }

    fn remove_employee(
        &self,
        company_id: CompanyId,
        id: &EmployeeId,
    ) -> Result<(), RepositoryError> {
        self.gate()?;
        self.inner.remove_employee(company_id, id)
    }

    fn periods(&self, company_id: CompanyId) -> Result<Vec<Period>, RepositoryError> {
        self.gate()?;
        self.inner.periods(company_id)
    }

    fn active_period(&self, company_id: CompanyId) -> Result<Option<Period>, RepositoryError> {
        self.gate()?;
        self.inner.active_period(company_id)
    }

    fn upsert_period(&self, period: Period) -> Result<(), RepositoryError> {
        self.gate()?;
        self.inner.upsert_period(period)
    }

    fn set_active_period(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
    ) -> Result<(), RepositoryError> {
        self.gate()?;
        self.inner.set_active_period(company_id, period)
    }

    fn delete_period(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
    ) -> Result<(), RepositoryError> {
        self.gate()?;
        self.inner.delete_period(company_id, period)
    }

    fn templates(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<QuestionnaireTemplate>, RepositoryError> {
        self.gate()?;
        self.inner.templates(company_id)
    }

    fn upsert_template(&self, template: QuestionnaireTemplate) -> Result<(), RepositoryError> {
        self.gate()?;
        self.inner.upsert_template(template)
    }

    fn binding(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
    ) -> Result<Option<CycleBinding>, RepositoryError> {
        self.gate()?;
        self.inner.binding(company_id, period)
    }

    fn template_questions(
        &self,
        company_id: CompanyId,
        template_id: i64,
    ) -> Result<Vec<Question>, RepositoryError> {
        self.gate()?;
        self.inner.template_questions(company_id, template_id)
    }

    fn bind_template(&self, binding: CycleBinding) -> Result<(), RepositoryError> {
        self.gate()?;
        self.inner.bind_template(binding)
    }

    fn evaluation(&self, key: &EvaluationKey) -> Result<Option<Evaluation>, RepositoryError> {
        self.gate()?;
        self.inner.evaluation(key)
    }

    fn upsert_evaluation(
        &self,
        evaluation: Evaluation,
    ) -> Result<Evaluation, RepositoryError> {
        self.gate()?;
        self.inner.upsert_evaluation(evaluation)
    }

    fn evaluations_for_period(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
        is_self_eval: bool,
    ) -> Result<Vec<Evaluation>, RepositoryError> {
        self.gate()?;
        self.inner
            .evaluations_for_period(company_id, period, is_self_eval)
    }

    fn evaluation_history(
        &self,
        company_id: CompanyId,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Evaluation>, RepositoryError> {
        self.gate()?;
        self.inner.evaluation_history(company_id, employee_id)
    }

    fn insert_goal(&self, goal: Goal) -> Result<Goal, RepositoryError> {
        self.gate()?;
        self.inner.insert_goal(goal)
    }

    fn update_goal(&self, goal: Goal) -> Result<(), RepositoryError> {
        self.gate()?;
        self.inner.update_goal(goal)
    }

    fn delete_goal(&self, company_id: CompanyId, goal_id: i64) -> Result<(), RepositoryError> {
        self.gate()?;
        self.inner.delete_goal(company_id, goal_id)
    }

    fn goals_for(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Goal>, RepositoryError> {
        self.gate()?;
        self.inner.goals_for(company_id, period, employee_id)
    }

    fn kpis_for(
        &self,
        company_id: CompanyId,
        goal_id: i64,
    ) -> Result<Vec<GoalKpi>, RepositoryError> {
        self.gate()?;
        self.inner.kpis_for(company_id, goal_id)
    }

    fn replace_kpis(
        &self,
        company_id: CompanyId,
        goal_id: i64,
        kpis: Vec<GoalKpi>,
        progress: f64,
    ) -> Result<(), RepositoryError> {
        self.gate()?;
        self.inner.replace_kpis(company_id, goal_id, kpis, progress)
    }

    fn development_plan(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
        employee_id: &EmployeeId,
    ) -> Result<Option<DevelopmentPlan>, RepositoryError> {
        self.gate()?;
        self.inner.development_plan(company_id, period, employee_id)
    }

    fn replace_development_plan(&self, plan: DevelopmentPlan) -> Result<(), RepositoryError> {
        self.gate()?;
        self.inner.replace_development_plan(plan)
    }
}

pub(super) fn service_over<S>(store: S) -> (ReviewService<S, InMemoryAuditLog>, Arc<InMemoryAuditLog>)
where
    S: ReviewStore + 'static,
{
    let audit = Arc::new(InMemoryAuditLog::new());
    let service = ReviewService::new(Arc::new(store), audit.clone());
    (service, audit)
}
