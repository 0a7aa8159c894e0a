use chrono::NaiveDate;
use serde::Deserialize;

use super::domain::{Education, Resume, WorkExperience};

const MAX_NAME_LEN: usize = 100;
const MAX_TITLE_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 200;
const MAX_FILE_PATH_LEN: usize = 500;

/// Raw candidate payload as received on the wire. Field names follow the
/// camelCase convention the intake form submits.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePayload {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub educations: Vec<EducationPayload>,
    #[serde(default)]
    pub work_experiences: Vec<WorkExperiencePayload>,
    #[serde(default)]
    pub cv: Option<ResumePayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPayload {
    pub institution: String,
    pub title: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperiencePayload {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePayload {
    pub file_path: String,
    pub file_type: String,
}

/// Validation failures raised while parsing an inbound candidate payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("invalid {field}: must be 1-{max} characters")]
    InvalidName { field: &'static str, max: usize },
    #[error("invalid email address")]
    InvalidEmail,
    #[error("invalid phone number")]
    InvalidPhone,
    #[error("invalid address: exceeds {max} characters")]
    InvalidAddress { max: usize },
    #[error("invalid {field} in {record} record")]
    InvalidField {
        record: &'static str,
        field: &'static str,
    },
    #[error("invalid date '{value}' in {record} record: expected YYYY-MM-DD")]
    InvalidDate {
        record: &'static str,
        value: String,
    },
}

/// The sanitized candidate data handed to the repository for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub educations: Vec<Education>,
    pub work_experiences: Vec<WorkExperience>,
    pub resume: Option<ResumeUpload>,
}

/// Résumé attachment prior to persistence; the store stamps `uploaded_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub file_path: String,
    pub file_type: String,
}

impl ResumeUpload {
    pub fn into_resume(self, uploaded_at: chrono::DateTime<chrono::Utc>) -> Resume {
        Resume {
            file_path: self.file_path,
            file_type: self.file_type,
            uploaded_at,
        }
    }
}

/// Parse-and-validate step between the wire payload and the workflow, so
/// malformed shapes fail fast before any persistence happens.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn submission_from_payload(
        &self,
        payload: CandidatePayload,
    ) -> Result<CandidateSubmission, IntakeViolation> {
        let first_name = required_name(&payload.first_name, "first name")?;
        let last_name = required_name(&payload.last_name, "last name")?;
        let email = validate_email(&payload.email)?;
        let phone = payload
            .phone
            .as_deref()
            .map(validate_phone)
            .transpose()?
            .flatten();
        let address = match payload.address {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
                    return Err(IntakeViolation::InvalidAddress {
                        max: MAX_DESCRIPTION_LEN,
                    });
                }
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            None => None,
        };

        let educations = payload
            .educations
            .into_iter()
            .map(education_from_payload)
            .collect::<Result<Vec<_>, _>>()?;
        let work_experiences = payload
            .work_experiences
            .into_iter()
            .map(experience_from_payload)
            .collect::<Result<Vec<_>, _>>()?;
        let resume = payload.cv.map(resume_from_payload).transpose()?;

        Ok(CandidateSubmission {
            first_name,
            last_name,
            email,
            phone,
            address,
            educations,
            work_experiences,
            resume,
        })
    }
}

fn required_name(raw: &str, field: &'static str) -> Result<String, IntakeViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LEN {
        return Err(IntakeViolation::InvalidName {
            field,
            max: MAX_NAME_LEN,
        });
    }
    Ok(trimmed.to_string())
}

fn validate_email(raw: &str) -> Result<String, IntakeViolation> {
    let trimmed = raw.trim();
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(IntakeViolation::InvalidEmail);
    };
    let domain_ok = domain.split('.').count() >= 2
        && domain
            .split('.')
            .all(|label| !label.is_empty() && !label.contains(char::is_whitespace));
    if local.is_empty() || local.contains(char::is_whitespace) || !domain_ok {
        return Err(IntakeViolation::InvalidEmail);
    }
    Ok(trimmed.to_string())
}

fn validate_phone(raw: &str) -> Result<Option<String>, IntakeViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let digits = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit())
        .count();
    let plausible = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    if !plausible || digits < 7 || digits > 15 {
        return Err(IntakeViolation::InvalidPhone);
    }
    Ok(Some(trimmed.to_string()))
}

fn parse_record_date(raw: &str, record: &'static str) -> Result<NaiveDate, IntakeViolation> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| IntakeViolation::InvalidDate {
        record,
        value: raw.to_string(),
    })
}

fn bounded_field(
    raw: &str,
    max: usize,
    record: &'static str,
    field: &'static str,
) -> Result<String, IntakeViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > max {
        return Err(IntakeViolation::InvalidField { record, field });
    }
    Ok(trimmed.to_string())
}

fn education_from_payload(payload: EducationPayload) -> Result<Education, IntakeViolation> {
    let institution = bounded_field(&payload.institution, MAX_NAME_LEN, "education", "institution")?;
    let title = bounded_field(&payload.title, MAX_TITLE_LEN, "education", "title")?;
    let start_date = parse_record_date(&payload.start_date, "education")?;
    let end_date = payload
        .end_date
        .as_deref()
        .map(|raw| parse_record_date(raw, "education"))
        .transpose()?;
    Ok(Education {
        institution,
        title,
        start_date,
        end_date,
    })
}

fn experience_from_payload(
    payload: WorkExperiencePayload,
) -> Result<WorkExperience, IntakeViolation> {
    let company = bounded_field(&payload.company, MAX_NAME_LEN, "work experience", "company")?;
    let position = bounded_field(&payload.position, MAX_TITLE_LEN, "work experience", "position")?;
    let description = match payload.description {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(IntakeViolation::InvalidField {
                    record: "work experience",
                    field: "description",
                });
            }
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        None => None,
    };
    let start_date = parse_record_date(&payload.start_date, "work experience")?;
    let end_date = payload
        .end_date
        .as_deref()
        .map(|raw| parse_record_date(raw, "work experience"))
        .transpose()?;
    Ok(WorkExperience {
        company,
        position,
        description,
        start_date,
        end_date,
    })
}

fn resume_from_payload(payload: ResumePayload) -> Result<ResumeUpload, IntakeViolation> {
    let file_path = bounded_field(&payload.file_path, MAX_FILE_PATH_LEN, "resume", "file path")?;
    let file_type = bounded_field(&payload.file_type, MAX_TITLE_LEN, "resume", "file type")?;
    Ok(ResumeUpload {
        file_path,
        file_type,
    })
}
