use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::config::PipelineConfig;
use crate::workflows::hiring::domain::{
    Application, Candidate, InterviewStep, StageHistoryEntry,
};
use crate::workflows::hiring::intake::{
    CandidatePayload, CandidateSubmission, EducationPayload, ResumePayload,
    WorkExperiencePayload,
};
use crate::workflows::hiring::repository::{
    PipelineRepository, PositionApplication, RepositoryError, StageTransition,
};
use crate::workflows::hiring::service::HiringPipelineService;

#[derive(Default)]
struct Store {
    candidates: Vec<Candidate>,
    applications: Vec<Application>,
    stages: Vec<InterviewStep>,
    employees: HashSet<i64>,
    positions: HashSet<i64>,
    histories: Vec<StageHistoryEntry>,
    scores: HashMap<i64, Vec<Option<f64>>>,
}

/// In-memory stand-in for the relational store used by the module tests.
#[derive(Default)]
pub(super) struct MemoryRepository {
    inner: Mutex<Store>,
}

impl MemoryRepository {
    pub(super) fn add_stage(&self, name: &str) -> InterviewStep {
        let mut store = self.inner.lock().expect("store mutex poisoned");
        let stage = InterviewStep {
            id: store.stages.len() as i64 + 1,
            name: name.to_string(),
        };
        store.stages.push(stage.clone());
        stage
    }

    pub(super) fn add_employee(&self, employee_id: i64) {
        let mut store = self.inner.lock().expect("store mutex poisoned");
        store.employees.insert(employee_id);
    }

    pub(super) fn add_position(&self, position_id: i64) {
        let mut store = self.inner.lock().expect("store mutex poisoned");
        store.positions.insert(position_id);
    }

    pub(super) fn add_application(
        &self,
        candidate_id: i64,
        position_id: i64,
        stage_id: i64,
    ) -> Application {
        let mut store = self.inner.lock().expect("store mutex poisoned");
        let application = Application {
            id: store.applications.len() as i64 + 1,
            position_id,
            candidate_id,
            application_date: Utc::now(),
            current_interview_step: stage_id,
            notes: None,
            modified_by_id: None,
        };
        store.applications.push(application.clone());
        application
    }

    pub(super) fn add_scores(&self, application_id: i64, scores: Vec<Option<f64>>) {
        let mut store = self.inner.lock().expect("store mutex poisoned");
        store.scores.insert(application_id, scores);
    }

    pub(super) fn history(&self) -> Vec<StageHistoryEntry> {
        let store = self.inner.lock().expect("store mutex poisoned");
        store.histories.clone()
    }

    pub(super) fn application(&self, application_id: i64) -> Option<Application> {
        let store = self.inner.lock().expect("store mutex poisoned");
        store
            .applications
            .iter()
            .find(|application| application.id == application_id)
            .cloned()
    }
}

impl PipelineRepository for MemoryRepository {
    fn create_candidate(
        &self,
        submission: CandidateSubmission,
    ) -> Result<Candidate, RepositoryError> {
        let mut store = self.inner.lock().expect("store mutex poisoned");
        if store
            .candidates
            .iter()
            .any(|candidate| candidate.email == submission.email)
        {
            return Err(RepositoryError::DuplicateKey("email"));
        }
        let candidate = Candidate {
            id: store.candidates.len() as i64 + 1,
            first_name: submission.first_name,
            last_name: submission.last_name,
            email: submission.email,
            phone: submission.phone,
            address: submission.address,
            educations: submission.educations,
            work_experiences: submission.work_experiences,
            resumes: submission
                .resume
                .map(|upload| vec![upload.into_resume(Utc::now())])
                .unwrap_or_default(),
        };
        store.candidates.push(candidate.clone());
        Ok(candidate)
    }

    fn candidate_by_id(&self, candidate_id: i64) -> Result<Option<Candidate>, RepositoryError> {
        let store = self.inner.lock().expect("store mutex poisoned");
        Ok(store
            .candidates
            .iter()
            .find(|candidate| candidate.id == candidate_id)
            .cloned())
    }

    fn application_for_candidate(
        &self,
        candidate_id: i64,
    ) -> Result<Option<(Application, InterviewStep)>, RepositoryError> {
        let store = self.inner.lock().expect("store mutex poisoned");
        let Some(application) = store
            .applications
            .iter()
            .find(|application| application.candidate_id == candidate_id)
            .cloned()
        else {
            return Ok(None);
        };
        let step = store
            .stages
            .iter()
            .find(|stage| stage.id == application.current_interview_step)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::Unavailable("interview step row missing".to_string())
            })?;
        Ok(Some((application, step)))
    }

    fn stage_by_name(&self, name: &str) -> Result<Option<InterviewStep>, RepositoryError> {
        let store = self.inner.lock().expect("store mutex poisoned");
        Ok(store.stages.iter().find(|stage| stage.name == name).cloned())
    }

    fn employee_exists(&self, employee_id: i64) -> Result<bool, RepositoryError> {
        let store = self.inner.lock().expect("store mutex poisoned");
        Ok(store.employees.contains(&employee_id))
    }

    fn apply_transition(
        &self,
        transition: StageTransition,
    ) -> Result<Application, RepositoryError> {
        // One lock guard spans both writes, so the update and the history
        // append land together.
        let mut store = self.inner.lock().expect("store mutex poisoned");
        let application = store
            .applications
            .iter_mut()
            .find(|application| application.id == transition.application_id)
            .ok_or(RepositoryError::NotFound)?;
        application.current_interview_step = transition.new_stage_id;
        if let Some(actor_id) = transition.modified_by_id {
            application.modified_by_id = Some(actor_id);
        }
        let updated = application.clone();
        store.histories.push(StageHistoryEntry {
            application_id: transition.application_id,
            previous_stage_id: transition.previous_stage_id,
            new_stage_id: transition.new_stage_id,
            modified_by_id: transition.audit_actor_id,
            changed_at: Utc::now(),
        });
        Ok(updated)
    }

    fn position_exists(&self, position_id: i64) -> Result<bool, RepositoryError> {
        let store = self.inner.lock().expect("store mutex poisoned");
        Ok(store.positions.contains(&position_id))
    }

    fn applications_for_position(
        &self,
        position_id: i64,
    ) -> Result<Vec<PositionApplication>, RepositoryError> {
        let store = self.inner.lock().expect("store mutex poisoned");
        store
            .applications
            .iter()
            .filter(|application| application.position_id == position_id)
            .map(|application| {
                let candidate = store
                    .candidates
                    .iter()
                    .find(|candidate| candidate.id == application.candidate_id)
                    .ok_or_else(|| {
                        RepositoryError::Unavailable("candidate row missing".to_string())
                    })?;
                let stage = store
                    .stages
                    .iter()
                    .find(|stage| stage.id == application.current_interview_step)
                    .ok_or_else(|| {
                        RepositoryError::Unavailable("interview step row missing".to_string())
                    })?;
                Ok(PositionApplication {
                    candidate_id: candidate.id,
                    full_name: candidate.full_name(),
                    current_stage_name: stage.name.clone(),
                    interview_scores: store
                        .scores
                        .get(&application.id)
                        .cloned()
                        .unwrap_or_default(),
                })
            })
            .collect()
    }

    fn history_for_application(
        &self,
        application_id: i64,
    ) -> Result<Vec<StageHistoryEntry>, RepositoryError> {
        let store = self.inner.lock().expect("store mutex poisoned");
        Ok(store
            .histories
            .iter()
            .filter(|entry| entry.application_id == application_id)
            .cloned()
            .collect())
    }
}

/// Repository whose every call fails, for exercising the 500 paths.
pub(super) struct UnavailableRepository;

impl PipelineRepository for UnavailableRepository {
    fn create_candidate(
        &self,
        _submission: CandidateSubmission,
    ) -> Result<Candidate, RepositoryError> {
        Err(unavailable())
    }

    fn candidate_by_id(&self, _candidate_id: i64) -> Result<Option<Candidate>, RepositoryError> {
        Err(unavailable())
    }

    fn application_for_candidate(
        &self,
        _candidate_id: i64,
    ) -> Result<Option<(Application, InterviewStep)>, RepositoryError> {
        Err(unavailable())
    }

    fn stage_by_name(&self, _name: &str) -> Result<Option<InterviewStep>, RepositoryError> {
        Err(unavailable())
    }

    fn employee_exists(&self, _employee_id: i64) -> Result<bool, RepositoryError> {
        Err(unavailable())
    }

    fn apply_transition(
        &self,
        _transition: StageTransition,
    ) -> Result<Application, RepositoryError> {
        Err(unavailable())
    }

    fn position_exists(&self, _position_id: i64) -> Result<bool, RepositoryError> {
        Err(unavailable())
    }

    fn applications_for_position(
        &self,
        _position_id: i64,
    ) -> Result<Vec<PositionApplication>, RepositoryError> {
        Err(unavailable())
    }

    fn history_for_application(
        &self,
        _application_id: i64,
    ) -> Result<Vec<StageHistoryEntry>, RepositoryError> {
        Err(unavailable())
    }
}

fn unavailable() -> RepositoryError {
    RepositoryError::Unavailable("store offline".to_string())
}

pub(super) fn service(
    repository: Arc<MemoryRepository>,
) -> HiringPipelineService<MemoryRepository> {
    HiringPipelineService::new(repository, PipelineConfig::default())
}

pub(super) fn candidate_payload(email: &str) -> CandidatePayload {
    CandidatePayload {
        first_name: "Juan".to_string(),
        last_name: "Pérez".to_string(),
        email: email.to_string(),
        phone: Some("+34 600 123 456".to_string()),
        address: Some("Calle Mayor 1, Madrid".to_string()),
        educations: vec![EducationPayload {
            institution: "Universidad Complutense".to_string(),
            title: "Computer Science".to_string(),
            start_date: "2015-09-01".to_string(),
            end_date: Some("2019-06-30".to_string()),
        }],
        work_experiences: vec![WorkExperiencePayload {
            company: "Acme Software".to_string(),
            position: "Backend Engineer".to_string(),
            description: Some("API development".to_string()),
            start_date: "2019-07-01".to_string(),
            end_date: None,
        }],
        cv: Some(ResumePayload {
            file_path: "uploads/juan-perez.pdf".to_string(),
            file_type: "application/pdf".to_string(),
        }),
    }
}

/// Seed a candidate with an application sitting at the named stage.
pub(super) fn seeded_candidate(
    repository: &Arc<MemoryRepository>,
    service: &HiringPipelineService<MemoryRepository>,
    email: &str,
    stage_name: &str,
) -> (i64, Application) {
    let candidate = service
        .add_candidate(candidate_payload(email))
        .expect("candidate persists");
    let stage = repository
        .stage_by_name(stage_name)
        .expect("stage lookup succeeds")
        .unwrap_or_else(|| repository.add_stage(stage_name));
    repository.add_position(1);
    let application = repository.add_application(candidate.id, 1, stage.id);
    (candidate.id, application)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
