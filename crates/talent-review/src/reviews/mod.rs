//! Performance review engine: questionnaires, evaluations with 9-box
//! scoring, gap analysis, goal and KPI tracking, development plans, and the
//! period lifecycle with its audited admin override.

pub mod development;
pub mod directory;
pub mod domain;
pub mod gap;
pub mod goals;
pub mod questionnaire;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use development::{
    DevelopmentPlan, EducationActivity, ExperienceActivity, MentoringActivity, PlanStatus,
    SupportCategory,
};
pub use directory::{export_evaluations, export_goals, parse_employees, EmployeeImportError};
pub use domain::{
    AnswerSheet, CompanyId, Employee, EmployeeId, EmployeeSnapshot, Evaluation, EvaluationKey,
    OverrideOutcome, Period, PeriodId, ReviewStatus, Role, TalentCategory, MAX_RATING, MIN_RATING,
};
pub use gap::{GapAlignment, GapEntry, GapReport, GapViewer};
pub use goals::{Goal, GoalKpi, GoalStatus, KpiDraft, KpiSaveOutcome};
pub use questionnaire::{
    standard_questionnaire, CycleBinding, Question, QuestionSection, Questionnaire,
    QuestionnaireMode, QuestionnaireTemplate, ResolvedQuestionnaire,
};
pub use report::{score_trail, team_summary, ScoreTrailPoint, TeamSummary};
pub use repository::{
    AuditAction, AuditEntry, AuditError, AuditLog, RepositoryError, ReviewStore,
};
pub use router::review_router;
pub use scoring::{average, categorize, score_answers, ScoreSummary};
pub use service::{EvaluationDraft, ReviewService, ReviewServiceError};
pub use store::{InMemoryAuditLog, InMemoryReviewStore};
