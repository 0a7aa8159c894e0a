use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talent_flow::workflows::hiring::{
    Application, Candidate, CandidateSubmission, InterviewStep, PipelineRepository,
    PositionApplication, RepositoryError, StageHistoryEntry, StageTransition,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct PipelineTables {
    candidates: Vec<Candidate>,
    applications: Vec<Application>,
    stages: Vec<InterviewStep>,
    employees: HashSet<i64>,
    positions: HashMap<i64, String>,
    histories: Vec<StageHistoryEntry>,
    scores: HashMap<i64, Vec<Option<f64>>>,
}

/// In-memory pipeline store. A relational backend slots in by providing
/// another `PipelineRepository` implementation; this one keeps everything
/// behind a single mutex so the transition write pair is trivially atomic.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPipelineRepository {
    tables: Arc<Mutex<PipelineTables>>,
}

impl InMemoryPipelineRepository {
    pub(crate) fn seed_stage(&self, name: &str) -> InterviewStep {
        let mut tables = self.tables.lock().expect("pipeline mutex poisoned");
        if let Some(existing) = tables.stages.iter().find(|stage| stage.name == name) {
            return existing.clone();
        }
        let stage = InterviewStep {
            id: tables.stages.len() as i64 + 1,
            name: name.to_string(),
        };
        tables.stages.push(stage.clone());
        stage
    }

    pub(crate) fn seed_position(&self, position_id: i64, title: &str) {
        let mut tables = self.tables.lock().expect("pipeline mutex poisoned");
        tables.positions.insert(position_id, title.to_string());
    }

    pub(crate) fn seed_employee(&self, employee_id: i64) {
        let mut tables = self.tables.lock().expect("pipeline mutex poisoned");
        tables.employees.insert(employee_id);
    }

    pub(crate) fn seed_application(
        &self,
        candidate_id: i64,
        position_id: i64,
        stage_id: i64,
    ) -> Application {
        let mut tables = self.tables.lock().expect("pipeline mutex poisoned");
        let application = Application {
            id: tables.applications.len() as i64 + 1,
            position_id,
            candidate_id,
            application_date: Utc::now(),
            current_interview_step: stage_id,
            notes: None,
            modified_by_id: None,
        };
        tables.applications.push(application.clone());
        application
    }

    pub(crate) fn seed_score(&self, application_id: i64, score: Option<f64>) {
        let mut tables = self.tables.lock().expect("pipeline mutex poisoned");
        tables
            .scores
            .entry(application_id)
            .or_default()
            .push(score);
    }
}

impl PipelineRepository for InMemoryPipelineRepository {
    fn create_candidate(
        &self,
        submission: CandidateSubmission,
    ) -> Result<Candidate, RepositoryError> {
        let mut tables = self.tables.lock().expect("pipeline mutex poisoned");
        if tables
            .candidates
            .iter()
            .any(|candidate| candidate.email == submission.email)
        {
            return Err(RepositoryError::DuplicateKey("email"));
        }
        let candidate = Candidate {
            id: tables.candidates.len() as i64 + 1,
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
        tables.candidates.push(candidate.clone());
        Ok(candidate)
    }

    fn candidate_by_id(&self, candidate_id: i64) -> Result<Option<Candidate>, RepositoryError> {
        let tables = self.tables.lock().expect("pipeline mutex poisoned");
        Ok(tables
            .candidates
            .iter()
            .find(|candidate| candidate.id == candidate_id)
            .cloned())
    }

    fn application_for_candidate(
        &self,
        candidate_id: i64,
    ) -> Result<Option<(Application, InterviewStep)>, RepositoryError> {
        let tables = self.tables.lock().expect("pipeline mutex poisoned");
        let Some(application) = tables
            .applications
            .iter()
            .find(|application| application.candidate_id == candidate_id)
            .cloned()
        else {
            return Ok(None);
        };
        let step = tables
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
        let tables = self.tables.lock().expect("pipeline mutex poisoned");
        Ok(tables
            .stages
            .iter()
            .find(|stage| stage.name == name)
            .cloned())
    }

    fn employee_exists(&self, employee_id: i64) -> Result<bool, RepositoryError> {
        let tables = self.tables.lock().expect("pipeline mutex poisoned");
        Ok(tables.employees.contains(&employee_id))
    }

    fn apply_transition(
        &self,
        transition: StageTransition,
    ) -> Result<Application, RepositoryError> {
        // One guard spans the row update and the ledger append; a partial
        // transition can never be observed.
        let mut tables = self.tables.lock().expect("pipeline mutex poisoned");
        let application = tables
            .applications
            .iter_mut()
            .find(|application| application.id == transition.application_id)
            .ok_or(RepositoryError::NotFound)?;
        application.current_interview_step = transition.new_stage_id;
        if let Some(actor_id) = transition.modified_by_id {
            application.modified_by_id = Some(actor_id);
        }
        let updated = application.clone();
        tables.histories.push(StageHistoryEntry {
            application_id: transition.application_id,
            previous_stage_id: transition.previous_stage_id,
            new_stage_id: transition.new_stage_id,
            modified_by_id: transition.audit_actor_id,
            changed_at: Utc::now(),
        });
        Ok(updated)
    }

    fn position_exists(&self, position_id: i64) -> Result<bool, RepositoryError> {
        let tables = self.tables.lock().expect("pipeline mutex poisoned");
        Ok(tables.positions.contains_key(&position_id))
    }

    fn applications_for_position(
        &self,
        position_id: i64,
    ) -> Result<Vec<PositionApplication>, RepositoryError> {
        let tables = self.tables.lock().expect("pipeline mutex poisoned");
        tables
            .applications
            .iter()
            .filter(|application| application.position_id == position_id)
            .map(|application| {
                let candidate = tables
                    .candidates
                    .iter()
                    .find(|candidate| candidate.id == application.candidate_id)
                    .ok_or_else(|| {
                        RepositoryError::Unavailable("candidate row missing".to_string())
                    })?;
                let stage = tables
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
                    interview_scores: tables
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
        let tables = self.tables.lock().expect("pipeline mutex poisoned");
        Ok(tables
            .histories
            .iter()
            .filter(|entry| entry.application_id == application_id)
            .cloned()
            .collect())
    }
}

/// Stage ladder and fixtures used by `--seed-demo` and the CLI demo.
pub(crate) fn seed_demo_data(repository: &InMemoryPipelineRepository) {
    for stage in [
        "Initial Screening",
        "Entrevista técnica",
        "Oferta",
        "Contratado",
        "Rechazado",
    ] {
        repository.seed_stage(stage);
    }
    repository.seed_position(1, "Senior Backend Engineer");
    repository.seed_position(2, "Data Engineer");
    repository.seed_employee(1);
    repository.seed_employee(3);
}
