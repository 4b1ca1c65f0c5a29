use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use talent_review::reviews::{
    CompanyId, Employee, EmployeeId, InMemoryAuditLog, InMemoryReviewStore, Period, PeriodId,
    ReviewService, ReviewServiceError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Tenant used when the service runs against the in-memory store.
pub(crate) const DEFAULT_COMPANY: CompanyId = CompanyId(1);

pub(crate) fn default_period() -> PeriodId {
    PeriodId("2026-H1".to_string())
}

/// Seed the in-memory store with a small org and an active period so the
/// endpoints are usable straight after startup.
pub(crate) fn seed_review_data(
    service: &ReviewService<InMemoryReviewStore, InMemoryAuditLog>,
) -> Result<(), ReviewServiceError> {
    let head = EmployeeId("100".to_string());
    let roster = [
        ("100", "Eszter Toth", "Head of Engineering", None),
        ("101", "Denes Farkas", "Software Engineer", Some(&head)),
        ("102", "Ilona Nagy", "Software Engineer", Some(&head)),
    ];

    for (id, full_name, job_title, manager_id) in roster {
        service.register_employee(Employee {
            id: EmployeeId(id.to_string()),
            full_name: full_name.to_string(),
            job_title: job_title.to_string(),
            department: "Engineering".to_string(),
            manager_id: manager_id.cloned(),
            is_manager: manager_id.is_none(),
            active: true,
            company_id: DEFAULT_COMPANY,
        })?;
    }

    service.create_period(Period {
        id: default_period(),
        start_date: None,
        deadline: None,
        is_active: false,
        company_id: DEFAULT_COMPANY,
    })?;
    service.activate_period(&head, DEFAULT_COMPANY, &default_period())?;

    Ok(())
}
