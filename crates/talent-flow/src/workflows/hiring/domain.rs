use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Stages from which no further transition is permitted. Seed data in
/// deployed pipelines carries both the English and Spanish labels, so the
/// guard recognizes both spellings.
pub const TERMINAL_STAGES: [&str; 4] = ["Rejected", "Hired", "Rechazado", "Contratado"];

/// Actor recorded in the stage-history ledger when a transition arrives
/// without a validated auditing actor.
pub const DEFAULT_AUDIT_ACTOR_ID: i64 = 1;

/// Longest stage name accepted by the transition workflow.
pub const MAX_STAGE_NAME_LEN: usize = 100;

/// A persisted candidate with the nested records created alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub educations: Vec<Education>,
    pub work_experiences: Vec<WorkExperience>,
    pub resumes: Vec<Resume>,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub title: String,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resume {
    pub file_path: String,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
}

/// A named step in the interview pipeline for a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewStep {
    pub id: i64,
    pub name: String,
}

impl InterviewStep {
    /// Whether this stage rejects further transitions.
    pub fn is_terminal(&self) -> bool {
        TERMINAL_STAGES.contains(&self.name.as_str())
    }
}

/// Links one candidate to one position and tracks pipeline progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub position_id: i64,
    pub candidate_id: i64,
    pub application_date: DateTime<Utc>,
    pub current_interview_step: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by_id: Option<i64>,
}

/// Immutable audit record appended for every stage transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageHistoryEntry {
    pub application_id: i64,
    pub previous_stage_id: i64,
    pub new_stage_id: i64,
    pub modified_by_id: i64,
    pub changed_at: DateTime<Utc>,
}

/// Result of a successful stage transition: the mutated application
/// enriched with its resolved stage and candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdatedApplication {
    #[serde(flatten)]
    pub application: Application,
    pub interview_step: InterviewStep,
    pub candidate: Candidate,
}
