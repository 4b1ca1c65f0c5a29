use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use super::development::DevelopmentPlan;
use super::domain::{
    CompanyId, Employee, EmployeeId, Evaluation, EvaluationKey, Period, PeriodId,
};
use super::goals::{Goal, GoalKpi};
use super::questionnaire::{CycleBinding, Question, QuestionnaireTemplate};
use super::repository::{
    AuditEntry, AuditError, AuditLog, RepositoryError, ReviewStore,
};

/// In-memory [`ReviewStore`] used by the API service, the demo, and the test
/// suites. Every multi-row operation runs under a single mutex guard, which
/// gives the transactional contract for free.
#[derive(Default, Clone)]
pub struct InMemoryReviewStore {
    inner: Arc<Mutex<StoreInner>>,
    next_goal_id: Arc<AtomicI64>,
}

#[derive(Default)]
struct StoreInner {
    employees: HashMap<(CompanyId, EmployeeId), Employee>,
    periods: HashMap<(CompanyId, PeriodId), Period>,
    bindings: HashMap<(CompanyId, PeriodId), CycleBinding>,
    templates: HashMap<(CompanyId, i64), QuestionnaireTemplate>,
    template_questions: HashMap<(CompanyId, i64), Vec<Question>>,
    evaluations: HashMap<EvaluationKey, Evaluation>,
    goals: HashMap<(CompanyId, i64), Goal>,
    kpis: HashMap<(CompanyId, i64), Vec<GoalKpi>>,
    plans: HashMap<(CompanyId, PeriodId, EmployeeId), DevelopmentPlan>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::default(),
            next_goal_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Seed questions onto a template so a binding resolves to them.
    pub fn put_template_questions(
        &self,
        company_id: CompanyId,
        template_id: i64,
        questions: Vec<Question>,
    ) {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard
            .template_questions
            .insert((company_id, template_id), questions);
    }
}

impl ReviewStore for InMemoryReviewStore {
    fn upsert_employee(&self, employee: Employee) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard
            .employees
            .insert((employee.company_id, employee.id.clone()), employee);
        Ok(())
    }

    fn employee(
        &self,
        company_id: CompanyId,
        id: &EmployeeId,
    ) -> Result<Option<Employee>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.employees.get(&(company_id, id.clone())).cloned())
    }

    fn employees(&self, company_id: CompanyId) -> Result<Vec<Employee>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        let mut employees: Vec<Employee> = guard
            .employees
            .values()
            .filter(|employee| employee.company_id == company_id)
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(employees)
    }

    fn team(
        &self,
        company_id: CompanyId,
        manager_id: &EmployeeId,
    ) -> Result<Vec<Employee>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        let mut team: Vec<Employee> = guard
            .employees
            .values()
            .filter(|employee| {
                employee.company_id == company_id
                    && employee.active
                    && employee.manager_id.as_ref() == Some(manager_id)
            })
            .cloned()
            .collect();
        team.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(team)
    }

    fn deactivate_employee(
        &self,
        company_id: CompanyId,
        id: &EmployeeId,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        match guard.employees.get_mut(&(company_id, id.clone())) {
            Some(employee) => {
                employee.active = false;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn remove_employee(
        &self,
        company_id: CompanyId,
        id: &EmployeeId,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard
            .employees
            .remove(&(company_id, id.clone()))
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn periods(&self, company_id: CompanyId) -> Result<Vec<Period>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        let mut periods: Vec<Period> = guard
            .periods
            .values()
            .filter(|period| period.company_id == company_id)
            .cloned()
            .collect();
        periods.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(periods)
    }

    fn active_period(&self, company_id: CompanyId) -> Result<Option<Period>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard
            .periods
            .values()
            .find(|period| period.company_id == company_id && period.is_active)
            .cloned())
    }

    fn upsert_period(&self, period: Period) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard
            .periods
            .insert((period.company_id, period.id.clone()), period);
        Ok(())
    }

    fn set_active_period(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        if !guard.periods.contains_key(&(company_id, period.clone())) {
            return Err(RepositoryError::NotFound);
        }
        for ((owner, _), row) in guard.periods.iter_mut() {
            if *owner == company_id {
                row.is_active = row.id == *period;
            }
        }
        Ok(())
    }

    fn delete_period(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard
            .periods
            .remove(&(company_id, period.clone()))
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn templates(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<QuestionnaireTemplate>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        let mut templates: Vec<QuestionnaireTemplate> = guard
            .templates
            .values()
            .filter(|template| template.company_id == company_id)
            .cloned()
            .collect();
        templates.sort_by_key(|template| template.id);
        Ok(templates)
    }

    fn upsert_template(&self, template: QuestionnaireTemplate) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard
            .templates
            .insert((template.company_id, template.id), template);
        Ok(())
    }

    fn binding(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
    ) -> Result<Option<CycleBinding>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.bindings.get(&(company_id, period.clone())).cloned())
    }

    fn template_questions(
        &self,
        company_id: CompanyId,
        template_id: i64,
    ) -> Result<Vec<Question>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard
            .template_questions
            .get(&(company_id, template_id))
            .cloned()
            .unwrap_or_default())
    }

    fn bind_template(&self, binding: CycleBinding) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard
            .bindings
            .insert((binding.company_id, binding.period.clone()), binding);
        Ok(())
    }

    fn evaluation(&self, key: &EvaluationKey) -> Result<Option<Evaluation>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.evaluations.get(key).cloned())
    }

    fn upsert_evaluation(
        &self,
        evaluation: Evaluation,
    ) -> Result<Evaluation, RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        match guard.evaluations.get_mut(&evaluation.key) {
            Some(existing) => {
                // Snapshot and manager link are write-once on first save.
                existing.avg_performance = evaluation.avg_performance;
                existing.avg_potential = evaluation.avg_potential;
                existing.category = evaluation.category;
                existing.comment = evaluation.comment;
                existing.answers = evaluation.answers;
                existing.status = evaluation.status;
                existing.last_modified = evaluation.last_modified;
                Ok(existing.clone())
            }
            None => {
                guard
                    .evaluations
                    .insert(evaluation.key.clone(), evaluation.clone());
                Ok(evaluation)
            }
        }
    }

    fn evaluations_for_period(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
        is_self_eval: bool,
    ) -> Result<Vec<Evaluation>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        let mut rows: Vec<Evaluation> = guard
            .evaluations
            .values()
            .filter(|evaluation| {
                evaluation.key.company_id == company_id
                    && evaluation.key.period == *period
                    && evaluation.key.is_self_eval == is_self_eval
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.key.employee_id.cmp(&b.key.employee_id));
        Ok(rows)
    }

    fn evaluation_history(
        &self,
        company_id: CompanyId,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Evaluation>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        let mut rows: Vec<Evaluation> = guard
            .evaluations
            .values()
            .filter(|evaluation| {
                evaluation.key.company_id == company_id
                    && evaluation.key.employee_id == *employee_id
                    && !evaluation.key.is_self_eval
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.key.period.cmp(&b.key.period));
        Ok(rows)
    }

    fn insert_goal(&self, mut goal: Goal) -> Result<Goal, RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        goal.id = self.next_goal_id.fetch_add(1, Ordering::SeqCst);
        guard.goals.insert((goal.company_id, goal.id), goal.clone());
        Ok(goal)
    }

    fn update_goal(&self, goal: Goal) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let key = (goal.company_id, goal.id);
        if guard.goals.contains_key(&key) {
            guard.goals.insert(key, goal);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn delete_goal(&self, company_id: CompanyId, goal_id: i64) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let key = (company_id, goal_id);
        if guard.goals.remove(&key).is_none() {
            return Err(RepositoryError::NotFound);
        }
        guard.kpis.remove(&key);
        Ok(())
    }

    fn goals_for(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Goal>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        let mut goals: Vec<Goal> = guard
            .goals
            .values()
            .filter(|goal| {
                goal.company_id == company_id
                    && goal.period == *period
                    && goal.employee_id == *employee_id
            })
            .cloned()
            .collect();
        goals.sort_by_key(|goal| goal.id);
        Ok(goals)
    }

    fn kpis_for(
        &self,
        company_id: CompanyId,
        goal_id: i64,
    ) -> Result<Vec<GoalKpi>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard
            .kpis
            .get(&(company_id, goal_id))
            .cloned()
            .unwrap_or_default())
    }

    fn replace_kpis(
        &self,
        company_id: CompanyId,
        goal_id: i64,
        kpis: Vec<GoalKpi>,
        progress: f64,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let key = (company_id, goal_id);
        let Some(goal) = guard.goals.get_mut(&key) else {
            return Err(RepositoryError::NotFound);
        };
        goal.progress = progress;
        guard.kpis.insert(key, kpis);
        Ok(())
    }

    fn development_plan(
        &self,
        company_id: CompanyId,
        period: &PeriodId,
        employee_id: &EmployeeId,
    ) -> Result<Option<DevelopmentPlan>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard
            .plans
            .get(&(company_id, period.clone(), employee_id.clone()))
            .cloned())
    }

    fn replace_development_plan(&self, plan: DevelopmentPlan) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard.plans.insert(
            (plan.company_id, plan.period.clone(), plan.employee_id.clone()),
            plan,
        );
        Ok(())
    }
}

/// In-memory audit trail with read access for assertions and the admin view.
#[derive(Default, Clone)]
pub struct InMemoryAuditLog {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditLog for InMemoryAuditLog {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditError> {
        let mut guard = self.entries.lock().expect("audit mutex poisoned");
        guard.push(entry);
        Ok(())
    }
}
