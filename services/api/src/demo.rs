use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use talent_review::error::AppError;
use talent_review::reviews::{
    parse_employees, AnswerSheet, EmployeeId, EvaluationKey, GapViewer, InMemoryAuditLog,
    InMemoryReviewStore, KpiDraft, PeriodId, ReviewService, ReviewStatus, Role,
    standard_questionnaire, team_summary,
};
use talent_review::reviews::goals::{Goal, GoalStatus};
use talent_review::reviews::service::EvaluationDraft;

use crate::infra::{default_period, seed_review_data, DEFAULT_COMPANY};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional roster CSV to import instead of the built-in demo org
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
    /// Review period name (defaults to the seeded demo period)
    #[arg(long)]
    pub(crate) period: Option<String>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { roster_csv, period } = args;

    let store = Arc::new(InMemoryReviewStore::new());
    let audit = Arc::new(InMemoryAuditLog::new());
    let service = ReviewService::new(store, audit.clone());

    println!("Talent review demo");
    seed_review_data(&service)?;

    if let Some(path) = roster_csv {
        let file = std::fs::File::open(&path)?;
        let imported = parse_employees(file, DEFAULT_COMPANY)?;
        println!("- Imported {} employees from {}", imported.len(), path.display());
        for employee in imported {
            service.register_employee(employee)?;
        }
    }

    let period = period
        .map(PeriodId)
        .unwrap_or_else(default_period);
    let manager = EmployeeId("100".to_string());
    let report = EmployeeId("101".to_string());

    let resolved = service.questionnaire(DEFAULT_COMPANY, &period)?;
    println!(
        "- Questionnaire for {}: {} questions ({:?} mode)",
        period.0,
        resolved.questionnaire.len(),
        resolved.mode
    );

    // The employee rates themselves high across the board.
    let self_answers: AnswerSheet = standard_questionnaire()
        .all()
        .map(|question| (question.id.clone(), 5))
        .collect();
    service.save_evaluation(EvaluationDraft {
        company_id: DEFAULT_COMPANY,
        period: period.clone(),
        employee_id: report.clone(),
        manager_id: Some(manager.clone()),
        answers: self_answers,
        comment: "I shipped everything I planned".to_string(),
        is_self_eval: true,
        target_status: ReviewStatus::Submitted,
    })?;
    println!("- Self-evaluation submitted");

    // The manager is more measured and submits a 3/4 split.
    let manager_answers: AnswerSheet = standard_questionnaire()
        .all()
        .enumerate()
        .map(|(index, question)| (question.id.clone(), if index % 2 == 0 { 3 } else { 4 }))
        .collect();
    let submitted = service.save_evaluation(EvaluationDraft {
        company_id: DEFAULT_COMPANY,
        period: period.clone(),
        employee_id: report.clone(),
        manager_id: Some(manager.clone()),
        answers: manager_answers,
        comment: "Strong delivery, keep growing the strategic side".to_string(),
        is_self_eval: false,
        target_status: ReviewStatus::Submitted,
    })?;
    println!(
        "- Manager evaluation submitted: perf {:.1} / pot {:.1} -> {}",
        submitted.avg_performance,
        submitted.avg_potential,
        submitted.category.label()
    );

    let gap = service.gap_analysis(GapViewer::Employee, DEFAULT_COMPANY, &period, &report)?;
    println!("- Gap report ({} questions):", gap.entries.len());
    for entry in gap.entries.iter().take(3) {
        println!(
            "    {} | self {} vs manager {} ({})",
            entry.question_title,
            entry.self_score,
            entry.manager_score,
            entry.alignment.label()
        );
    }

    let goal = service.create_goal(Goal {
        id: 0,
        period: period.clone(),
        employee_id: report.clone(),
        manager_id: manager.clone(),
        title: "Own the quarterly release train".to_string(),
        description: "Coordinate releases across three teams".to_string(),
        weight: 50,
        progress: 0.0,
        status: GoalStatus::OnTrack,
        deadline: None,
        company_id: DEFAULT_COMPANY,
    })?;
    let outcome = service.save_goal_kpis(
        DEFAULT_COMPANY,
        goal.id,
        vec![
            KpiDraft {
                description: "Releases shipped on schedule".to_string(),
                weight: 70,
                progress: 75.0,
            },
            KpiDraft {
                description: "Rollback rate below 2%".to_string(),
                weight: 20,
                progress: 100.0,
            },
        ],
    )?;
    println!(
        "- Goal progress {:.0}% (weights sum to {}%)",
        outcome.progress, outcome.weight_total
    );
    if let Some(warning) = &outcome.warning {
        println!("    warning: {warning}");
    }

    // HR reopens the manager evaluation to fix a mistyped score.
    let key = EvaluationKey {
        company_id: DEFAULT_COMPANY,
        period: period.clone(),
        employee_id: report.clone(),
        is_self_eval: false,
    };
    let outcome = service.unlock_evaluation(
        &manager,
        Role::Hr,
        &key,
        "composure score was entered for the wrong report",
    )?;
    println!("- Admin override: {}", outcome.message());

    println!("- Audit trail:");
    for entry in audit.entries() {
        println!(
            "    [{}] {} by {}: {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.action.label(),
            entry.actor.0,
            entry.details
        );
    }

    let evaluations = service.manager_evaluations(DEFAULT_COMPANY, &period)?;
    let summary = team_summary(&evaluations);
    println!(
        "- Dashboard: {} evaluations ({} submitted, {} drafts)",
        summary.total, summary.submitted, summary.drafts
    );
    for row in &summary.breakdown {
        println!("    {}: {}", row.category_label, row.count);
    }

    Ok(())
}
