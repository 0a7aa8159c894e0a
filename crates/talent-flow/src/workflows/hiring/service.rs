use std::fmt;
use std::sync::Arc;

use tracing::{error, warn};

use crate::config::PipelineConfig;

use super::domain::{Candidate, UpdatedApplication, MAX_STAGE_NAME_LEN};
use super::intake::{CandidatePayload, IntakeGuard, IntakeViolation};
use super::report::{summarize_position, PositionCandidateRow};
use super::repository::{PipelineRepository, RepositoryError, StageTransition};

/// Service composing the intake guard and repository behind the hiring
/// pipeline operations: candidate intake, the guarded stage-transition
/// workflow, and the position candidate report.
pub struct HiringPipelineService<R> {
    repository: Arc<R>,
    intake: IntakeGuard,
    config: PipelineConfig,
}

impl<R> HiringPipelineService<R>
where
    R: PipelineRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: PipelineConfig) -> Self {
        Self {
            repository,
            intake: IntakeGuard::default(),
            config,
        }
    }

    /// Validate and persist an inbound candidate payload, including the
    /// nested education, work-experience, and résumé records.
    pub fn add_candidate(&self, payload: CandidatePayload) -> Result<Candidate, PipelineError> {
        let submission = self.intake.submission_from_payload(payload)?;
        match self.repository.create_candidate(submission) {
            Ok(candidate) => Ok(candidate),
            Err(RepositoryError::DuplicateKey(_)) => Err(PipelineError::DuplicateEmail),
            Err(err) => {
                error!(%err, "candidate persistence failed");
                Err(PipelineError::Repository(err))
            }
        }
    }

    pub fn candidate_by_id(&self, candidate_id: i64) -> Result<Candidate, PipelineError> {
        validate_candidate_id(candidate_id)?;
        self.repository
            .candidate_by_id(candidate_id)?
            .ok_or(PipelineError::NotFound(MissingEntity::Candidate))
    }

    /// Move a candidate's application to the named stage.
    ///
    /// Guards the terminal stages, resolves the target stage by exact
    /// name, optionally validates the auditing actor, and applies the
    /// application update together with the history append as one atomic
    /// repository call. Exactly one application mutation and one history
    /// insertion happen on success; none on any failure path.
    pub fn transition_stage(
        &self,
        candidate_id: i64,
        stage_name: &str,
        actor_id: Option<i64>,
    ) -> Result<UpdatedApplication, PipelineError> {
        validate_candidate_id(candidate_id)?;
        validate_stage_name(stage_name)?;

        let Some(candidate) = self.repository.candidate_by_id(candidate_id)? else {
            error!(candidate_id, "candidate not found");
            return Err(PipelineError::NotFound(MissingEntity::Candidate));
        };

        let Some((application, current_step)) =
            self.repository.application_for_candidate(candidate_id)?
        else {
            error!(candidate_id, "no application on file for candidate");
            return Err(PipelineError::NotFound(MissingEntity::Application));
        };

        if current_step.is_terminal() {
            return Err(PipelineError::IllegalTransition {
                stage: current_step.name,
            });
        }

        let Some(target) = self.repository.stage_by_name(stage_name)? else {
            error!(candidate_id, stage_name, "target stage not found");
            return Err(PipelineError::NotFound(MissingEntity::Stage));
        };

        let modified_by_id = self.validated_actor(actor_id)?;

        let updated = self.repository.apply_transition(StageTransition {
            application_id: application.id,
            previous_stage_id: application.current_interview_step,
            new_stage_id: target.id,
            modified_by_id,
            audit_actor_id: modified_by_id.unwrap_or(self.config.default_audit_actor_id),
        })?;

        Ok(UpdatedApplication {
            application: updated,
            interview_step: target,
            candidate,
        })
    }

    /// Per-candidate report for a position: one row per distinct
    /// candidate with the current stage name and average interview score.
    pub fn position_report(
        &self,
        position_id: i64,
    ) -> Result<Vec<PositionCandidateRow>, PipelineError> {
        if position_id <= 0 {
            return Err(PipelineError::InvalidInput(format!(
                "position id must be a positive integer, got {position_id}"
            )));
        }
        if !self.repository.position_exists(position_id)? {
            error!(position_id, "position not found");
            return Err(PipelineError::NotFound(MissingEntity::Position));
        }
        let applications = self.repository.applications_for_position(position_id)?;
        Ok(summarize_position(applications))
    }

    /// Attribution is best-effort: an unknown actor downgrades to a
    /// warning instead of failing the transition.
    fn validated_actor(&self, actor_id: Option<i64>) -> Result<Option<i64>, PipelineError> {
        let Some(actor_id) = actor_id else {
            return Ok(None);
        };
        if self.repository.employee_exists(actor_id)? {
            Ok(Some(actor_id))
        } else {
            warn!(actor_id, "employee does not exist; skipping audit attribution");
            Ok(None)
        }
    }
}

fn validate_candidate_id(candidate_id: i64) -> Result<(), PipelineError> {
    if candidate_id <= 0 {
        return Err(PipelineError::InvalidInput(format!(
            "candidate id must be a positive integer, got {candidate_id}"
        )));
    }
    Ok(())
}

fn validate_stage_name(stage_name: &str) -> Result<(), PipelineError> {
    if stage_name.trim().is_empty() || stage_name.chars().count() > MAX_STAGE_NAME_LEN {
        return Err(PipelineError::InvalidInput(format!(
            "stage name must be 1-{MAX_STAGE_NAME_LEN} non-whitespace characters"
        )));
    }
    Ok(())
}

/// Which lookup came up empty. The HTTP boundary still answers a uniform
/// 404, but logs and tests can tell the cases apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingEntity {
    Candidate,
    Application,
    Stage,
    Position,
}

impl fmt::Display for MissingEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MissingEntity::Candidate => "candidate",
            MissingEntity::Application => "application",
            MissingEntity::Stage => "stage",
            MissingEntity::Position => "position",
        };
        f.write_str(label)
    }
}

/// Error raised by the hiring pipeline service.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error("{0} not found")]
    NotFound(MissingEntity),
    #[error("cannot change stage: candidate is already in terminal stage \"{stage}\"")]
    IllegalTransition { stage: String },
    #[error("the email already exists in the database")]
    DuplicateEmail,
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for PipelineError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::DuplicateKey(_) => Self::DuplicateEmail,
            other => Self::Repository(other),
        }
    }
}
