//! Employee roster import/export.
//!
//! Rosters arrive from spreadsheet exports, so parsing tolerates the usual
//! damage: numeric ids rendered as floats ("1001.0"), stray whitespace, and
//! blank filler rows.

use std::io::{Read, Write};

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{CompanyId, Employee, EmployeeId, Evaluation};
use super::goals::{normalize_progress, Goal};

#[derive(Debug, thiserror::Error)]
pub enum EmployeeImportError {
    #[error("failed to read roster: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Employee ID")]
    employee_id: String,
    #[serde(rename = "Full Name")]
    full_name: String,
    #[serde(rename = "Job Title", default)]
    job_title: String,
    #[serde(rename = "Department", default)]
    department: String,
    #[serde(
        rename = "Manager ID",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    manager_id: Option<String>,
    #[serde(rename = "Is Manager", default)]
    is_manager: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Strip the ".0" suffix spreadsheets attach to numeric id columns.
fn clean_id(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed).to_string()
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}

/// Parse a roster CSV into employee records for the given company. Rows with
/// a blank employee id are skipped rather than failing the whole import.
pub fn parse_employees<R: Read>(
    reader: R,
    company_id: CompanyId,
) -> Result<Vec<Employee>, EmployeeImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut employees = Vec::new();

    for record in csv_reader.deserialize::<RosterRow>() {
        let row = record?;
        let id = clean_id(&row.employee_id);
        if id.is_empty() {
            continue;
        }

        let manager_id = row
            .manager_id
            .as_deref()
            .map(clean_id)
            .filter(|value| !value.is_empty())
            .map(EmployeeId);

        employees.push(Employee {
            id: EmployeeId(id),
            full_name: row.full_name,
            job_title: row.job_title,
            department: row.department,
            manager_id,
            is_manager: parse_flag(row.is_manager.as_deref()),
            active: true,
            company_id,
        });
    }

    Ok(employees)
}

#[derive(Debug, Serialize)]
struct EvaluationExportRow<'a> {
    #[serde(rename = "Employee ID")]
    employee_id: &'a str,
    #[serde(rename = "Full Name")]
    full_name: &'a str,
    #[serde(rename = "Period")]
    period: &'a str,
    #[serde(rename = "Performance")]
    avg_performance: f64,
    #[serde(rename = "Potential")]
    avg_potential: f64,
    #[serde(rename = "Category")]
    category: &'static str,
    #[serde(rename = "Status")]
    status: &'static str,
}

/// Export manager evaluations as CSV for offline analysis.
pub fn export_evaluations<W: Write>(
    writer: W,
    evaluations: &[Evaluation],
) -> Result<(), EmployeeImportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for evaluation in evaluations {
        csv_writer.serialize(EvaluationExportRow {
            employee_id: &evaluation.key.employee_id.0,
            full_name: &evaluation.snapshot.full_name,
            period: &evaluation.key.period.0,
            avg_performance: evaluation.avg_performance,
            avg_potential: evaluation.avg_potential,
            category: evaluation.category.label(),
            status: evaluation.status.label(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct GoalExportRow<'a> {
    #[serde(rename = "Employee ID")]
    employee_id: &'a str,
    #[serde(rename = "Period")]
    period: &'a str,
    #[serde(rename = "Goal")]
    title: &'a str,
    #[serde(rename = "Weight")]
    weight: u32,
    #[serde(rename = "Progress %")]
    progress_pct: f64,
    #[serde(rename = "Status")]
    status: &'static str,
}

/// Export goals with their rolled-up progress as CSV.
pub fn export_goals<W: Write>(writer: W, goals: &[Goal]) -> Result<(), EmployeeImportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for goal in goals {
        csv_writer.serialize(GoalExportRow {
            employee_id: &goal.employee_id.0,
            period: &goal.period.0,
            title: &goal.title,
            weight: goal.weight,
            progress_pct: (normalize_progress(goal.progress) * 100.0).round(),
            status: goal.status.label(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
