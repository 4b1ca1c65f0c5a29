use serde::{Deserialize, Serialize};

use super::domain::{AnswerSheet, Evaluation};
use super::questionnaire::{Questionnaire, QuestionSection};

/// Direction of the manager/self rating difference on one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapAlignment {
    ManagerLower,
    ManagerHigher,
    Aligned,
}

impl GapAlignment {
    pub const fn label(self) -> &'static str {
        match self {
            GapAlignment::ManagerLower => "manager scored lower",
            GapAlignment::ManagerHigher => "manager scored higher",
            GapAlignment::Aligned => "aligned",
        }
    }

    fn from_delta(delta: i16) -> Self {
        match delta {
            d if d < 0 => GapAlignment::ManagerLower,
            d if d > 0 => GapAlignment::ManagerHigher,
            _ => GapAlignment::Aligned,
        }
    }
}

/// Per-question comparison row. Missing ratings default to 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapEntry {
    pub question_id: String,
    pub question_title: String,
    pub section: QuestionSection,
    pub self_score: u8,
    pub manager_score: u8,
    pub delta: i16,
    pub alignment: GapAlignment,
}

/// Gap analysis over the full resolved questionnaire, plus both sides'
/// stored averages on both axes for the headline metrics. A missing
/// evaluation reports 0.0 on its axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    pub entries: Vec<GapEntry>,
    pub self_avg_performance: f64,
    pub self_avg_potential: f64,
    pub manager_avg_performance: f64,
    pub manager_avg_potential: f64,
}

/// Compare the two answer sheets question by question, in form order.
pub fn compare(
    questionnaire: &Questionnaire,
    self_answers: &AnswerSheet,
    manager_answers: &AnswerSheet,
) -> Vec<GapEntry> {
    questionnaire
        .all()
        .map(|question| {
            let self_score = self_answers.rating(&question.id);
            let manager_score = manager_answers.rating(&question.id);
            let delta = manager_score as i16 - self_score as i16;
            GapEntry {
                question_id: question.id.clone(),
                question_title: question.title.clone(),
                section: question.section,
                self_score,
                manager_score,
                delta,
                alignment: GapAlignment::from_delta(delta),
            }
        })
        .collect()
}

/// Who is asking to see the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapViewer {
    Employee,
    Manager,
}

/// Disclosure rule for gap data. Enforced by the caller of [`compare`], not
/// the comparator itself.
///
/// The asymmetry is deliberate: an employee sees the comparison only after
/// the manager evaluation is Submitted (no probing a manager's in-progress
/// rating), while a manager may see it as soon as a self-evaluation exists,
/// whatever the manager's own status.
pub fn gap_visible(
    viewer: GapViewer,
    self_eval: Option<&Evaluation>,
    manager_eval: Option<&Evaluation>,
) -> bool {
    match viewer {
        GapViewer::Employee => {
            self_eval.is_some()
                && manager_eval
                    .map(|eval| eval.status.is_locked())
                    .unwrap_or(false)
        }
        GapViewer::Manager => self_eval.is_some(),
    }
}
