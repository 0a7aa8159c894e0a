use super::domain::{Application, Candidate, InterviewStep, StageHistoryEntry};
use super::intake::CandidateSubmission;

/// Storage abstraction over the relational store so the workflow can run
/// against an in-memory repository in tests and a database-backed one in
/// production.
pub trait PipelineRepository: Send + Sync {
    /// Persist a validated submission, cascading creation of the nested
    /// education, work-experience, and résumé records.
    fn create_candidate(
        &self,
        submission: CandidateSubmission,
    ) -> Result<Candidate, RepositoryError>;

    fn candidate_by_id(&self, candidate_id: i64) -> Result<Option<Candidate>, RepositoryError>;

    /// First application on file for the candidate, joined with its
    /// current interview step.
    fn application_for_candidate(
        &self,
        candidate_id: i64,
    ) -> Result<Option<(Application, InterviewStep)>, RepositoryError>;

    /// Case-sensitive exact-name stage lookup.
    fn stage_by_name(&self, name: &str) -> Result<Option<InterviewStep>, RepositoryError>;

    fn employee_exists(&self, employee_id: i64) -> Result<bool, RepositoryError>;

    /// Apply a stage change: the application-row update and the history
    /// append must land together or not at all.
    fn apply_transition(&self, transition: StageTransition)
        -> Result<Application, RepositoryError>;

    fn position_exists(&self, position_id: i64) -> Result<bool, RepositoryError>;

    /// All applications for a position joined with candidate names, stage
    /// names, and recorded interview scores, in query order.
    fn applications_for_position(
        &self,
        position_id: i64,
    ) -> Result<Vec<PositionApplication>, RepositoryError>;

    /// Audit ledger entries for an application, oldest first.
    fn history_for_application(
        &self,
        application_id: i64,
    ) -> Result<Vec<StageHistoryEntry>, RepositoryError>;
}

/// Atomic write unit for one stage transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTransition {
    pub application_id: i64,
    pub previous_stage_id: i64,
    pub new_stage_id: i64,
    /// Actor stored on the application row; only present when validated.
    pub modified_by_id: Option<i64>,
    /// Actor stored in the history ledger: the validated actor, or the
    /// configured fallback when attribution was skipped.
    pub audit_actor_id: i64,
}

/// One application row as needed by the position candidate report.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionApplication {
    pub candidate_id: i64,
    pub full_name: String,
    pub current_stage_name: String,
    /// Scores for the interviews held against this application; `None`
    /// marks an interview that was held but not scored.
    pub interview_scores: Vec<Option<f64>>,
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("unique constraint violated on {0}")]
    DuplicateKey(&'static str),
    #[error("record not found")]
    NotFound,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
