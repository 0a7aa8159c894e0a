use crate::infra::{seed_demo_data, InMemoryPipelineRepository};
use clap::Args;
use serde_json::json;
use std::sync::Arc;
use talent_flow::config::PipelineConfig;
use talent_flow::error::AppError;
use talent_flow::workflows::hiring::{
    CandidatePayload, EducationPayload, HiringPipelineService, ResumePayload,
    WorkExperiencePayload,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Employee id attributed with the demo stage change
    #[arg(long, default_value_t = 3)]
    pub(crate) actor_id: i64,
    /// Target stage for the demo transition
    #[arg(long, default_value = "Entrevista técnica")]
    pub(crate) stage: String,
}

/// Seed an in-memory pipeline, walk a candidate through a stage change,
/// and print the resulting records as JSON.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryPipelineRepository::default());
    seed_demo_data(&repository);
    let service = HiringPipelineService::new(repository.clone(), PipelineConfig::default());

    let candidate = service.add_candidate(demo_candidate())?;
    let screening = repository.seed_stage("Initial Screening");
    let application = repository.seed_application(candidate.id, 1, screening.id);
    repository.seed_score(application.id, Some(4.5));
    repository.seed_score(application.id, None);

    let updated = service.transition_stage(candidate.id, &args.stage, Some(args.actor_id))?;
    let report = service.position_report(1)?;

    let output = json!({
        "candidate": candidate,
        "transition": updated,
        "position_report": report,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
    );
    Ok(())
}

fn demo_candidate() -> CandidatePayload {
    CandidatePayload {
        first_name: "Carlos".to_string(),
        last_name: "García".to_string(),
        email: "carlos.garcia@example.com".to_string(),
        phone: Some("+34 600 987 654".to_string()),
        address: None,
        educations: vec![EducationPayload {
            institution: "Universidad Politécnica de Madrid".to_string(),
            title: "Ingeniería Informática".to_string(),
            start_date: "2014-09-01".to_string(),
            end_date: Some("2018-06-30".to_string()),
        }],
        work_experiences: vec![WorkExperiencePayload {
            company: "LTI".to_string(),
            position: "Software Engineer".to_string(),
            description: Some("Applicant tracking systems".to_string()),
            start_date: "2018-07-01".to_string(),
            end_date: None,
        }],
        cv: Some(ResumePayload {
            file_path: "uploads/carlos-garcia.pdf".to_string(),
            file_type: "application/pdf".to_string(),
        }),
    }
}
