//! Hiring pipeline workflows: candidate intake, the guarded interview
//! stage-transition state machine with its audit ledger, and the position
//! candidate report.

pub mod domain;
pub mod intake;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, Candidate, Education, InterviewStep, Resume, StageHistoryEntry,
    UpdatedApplication, WorkExperience, DEFAULT_AUDIT_ACTOR_ID, MAX_STAGE_NAME_LEN,
    TERMINAL_STAGES,
};
pub use intake::{
    CandidatePayload, CandidateSubmission, EducationPayload, IntakeGuard, IntakeViolation,
    ResumePayload, ResumeUpload, WorkExperiencePayload,
};
pub use report::PositionCandidateRow;
pub use repository::{
    PipelineRepository, PositionApplication, RepositoryError, StageTransition,
};
pub use router::{hiring_router, StageUpdateRequest};
pub use service::{HiringPipelineService, MissingEntity, PipelineError};
