use serde::{Deserialize, Serialize};

use super::domain::{CompanyId, PeriodId};

/// Which scoring axis a question feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSection {
    Performance,
    Potential,
}

/// One question on a review form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub section: QuestionSection,
    pub title: String,
    pub description: String,
    /// Free-text guidance describing what a top rating looks like.
    pub criteria: String,
    pub order_index: u32,
}

/// A company-owned questionnaire template. Questions live on the template via
/// the store; a template with zero questions is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireTemplate {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub company_id: CompanyId,
}

/// Binds a template to a review period. At most one binding per
/// (period, company); rebinding replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleBinding {
    pub period: PeriodId,
    pub template_id: i64,
    pub company_id: CompanyId,
}

/// Whether the resolved questions came from a bound template or the built-in
/// fallback set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionnaireMode {
    Standard,
    Dynamic,
}

/// The active question set for a period, partitioned by axis with the
/// original order preserved inside each partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Questionnaire {
    pub performance: Vec<Question>,
    pub potential: Vec<Question>,
}

impl Questionnaire {
    /// Partition a flat question list by section, ordered by `order_index`.
    pub fn from_questions(mut questions: Vec<Question>) -> Self {
        questions.sort_by_key(|question| question.order_index);

        let mut performance = Vec::new();
        let mut potential = Vec::new();
        for question in questions {
            match question.section {
                QuestionSection::Performance => performance.push(question),
                QuestionSection::Potential => potential.push(question),
            }
        }

        Self {
            performance,
            potential,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.performance.is_empty() && self.potential.is_empty()
    }

    pub fn len(&self) -> usize {
        self.performance.len() + self.potential.len()
    }

    /// All questions, performance first, each partition in form order.
    pub fn all(&self) -> impl Iterator<Item = &Question> {
        self.performance.iter().chain(self.potential.iter())
    }
}

/// Resolver output: the question set plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedQuestionnaire {
    pub mode: QuestionnaireMode,
    pub questionnaire: Questionnaire,
}

fn standard_question(
    id: &str,
    section: QuestionSection,
    order_index: u32,
    title: &str,
    description: &str,
    criteria: &str,
) -> Question {
    Question {
        id: id.to_string(),
        section,
        title: title.to_string(),
        description: description.to_string(),
        criteria: criteria.to_string(),
        order_index,
    }
}

/// The hardcoded fallback questionnaire: five performance and five potential
/// questions. Used whenever a period has no usable template, so a freshly
/// created (and still empty) template can never brick the review forms for a
/// whole company.
pub fn standard_questionnaire() -> Questionnaire {
    let performance = vec![
        standard_question(
            "P1",
            QuestionSection::Performance,
            1,
            "Goals and KPIs",
            "Degree to which the agreed quantitative targets were met.",
            "For a 5: exceeds targets by more than 20%.",
        ),
        standard_question(
            "P2",
            QuestionSection::Performance,
            2,
            "Quality of work",
            "Accuracy, thoroughness, and reliability in completing tasks.",
            "For a 5: work is error-free and fully trusted.",
        ),
        standard_question(
            "P3",
            QuestionSection::Performance,
            3,
            "Expertise",
            "Technical knowledge and skills needed for independent work.",
            "For a 5: an expert in the field who teaches others.",
        ),
        standard_question(
            "P4",
            QuestionSection::Performance,
            4,
            "Ownership",
            "Sense of ownership over the final outcome of a task or project.",
            "For a 5: acts like an owner and is proactive.",
        ),
        standard_question(
            "P5",
            QuestionSection::Performance,
            5,
            "Collaboration",
            "Information sharing and teamwork.",
            "For a 5: builds bridges between teams and helps colleagues.",
        ),
    ];

    let potential = vec![
        standard_question(
            "POT1",
            QuestionSection::Potential,
            1,
            "Learning agility",
            "Speed of absorbing new knowledge and adapting to change.",
            "For a 5: learns exceptionally fast and seeks new challenges.",
        ),
        standard_question(
            "POT2",
            QuestionSection::Potential,
            2,
            "Influence",
            "Ability to influence others without formal authority.",
            "For a 5: a natural leader people listen to and respect.",
        ),
        standard_question(
            "POT3",
            QuestionSection::Potential,
            3,
            "Big-picture thinking",
            "Understanding of how one's own work affects company goals.",
            "For a 5: thinks strategically and proposes company-wide solutions.",
        ),
        standard_question(
            "POT4",
            QuestionSection::Potential,
            4,
            "Ambition",
            "Drive to advance and take on greater responsibility.",
            "For a 5: clearly shows hunger for a bigger role.",
        ),
        standard_question(
            "POT5",
            QuestionSection::Potential,
            5,
            "Composure",
            "Keeping focus and calm under pressure.",
            "For a 5: the rock of the team when things are hardest.",
        ),
    ];

    Questionnaire {
        performance,
        potential,
    }
}
