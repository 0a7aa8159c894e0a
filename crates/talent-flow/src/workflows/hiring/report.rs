use std::collections::HashSet;

use serde::Serialize;

use super::repository::PositionApplication;

/// One row of the position candidate report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionCandidateRow {
    pub full_name: String,
    pub current_interview_step: String,
    pub average_score: Option<f64>,
}

/// Collapse the position's applications into report rows: one row per
/// distinct candidate (first occurrence wins, guarding against duplicate
/// applications) with the full-precision mean of the scored interviews.
pub(crate) fn summarize_position(
    applications: Vec<PositionApplication>,
) -> Vec<PositionCandidateRow> {
    let mut seen = HashSet::new();
    applications
        .into_iter()
        .filter(|application| seen.insert(application.candidate_id))
        .map(|application| PositionCandidateRow {
            full_name: application.full_name,
            current_interview_step: application.current_stage_name,
            average_score: average_score(&application.interview_scores),
        })
        .collect()
}

fn average_score(scores: &[Option<f64>]) -> Option<f64> {
    let scored: Vec<f64> = scores.iter().flatten().copied().collect();
    if scored.is_empty() {
        return None;
    }
    Some(scored.iter().sum::<f64>() / scored.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(candidate_id: i64, scores: Vec<Option<f64>>) -> PositionApplication {
        PositionApplication {
            candidate_id,
            full_name: format!("Candidate {candidate_id}"),
            current_stage_name: "Technical Interview".to_string(),
            interview_scores: scores,
        }
    }

    #[test]
    fn averages_ignore_unscored_interviews() {
        let rows = summarize_position(vec![application(1, vec![Some(4.0), None, Some(5.0)])]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].average_score, Some(4.5));
    }

    #[test]
    fn no_scores_yields_null_average() {
        let rows = summarize_position(vec![application(1, vec![None, None])]);
        assert_eq!(rows[0].average_score, None);

        let rows = summarize_position(vec![application(2, Vec::new())]);
        assert_eq!(rows[0].average_score, None);
    }

    #[test]
    fn duplicate_candidates_collapse_to_first_row() {
        let rows = summarize_position(vec![
            application(3, vec![Some(2.0)]),
            application(3, vec![Some(5.0)]),
            application(4, vec![Some(3.0)]),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].average_score, Some(2.0));
        assert_eq!(rows[1].average_score, Some(3.0));
    }

    #[test]
    fn preserves_query_order() {
        let rows = summarize_position(vec![
            application(9, Vec::new()),
            application(2, Vec::new()),
            application(5, Vec::new()),
        ]);
        let names: Vec<_> = rows.iter().map(|row| row.full_name.as_str()).collect();
        assert_eq!(names, ["Candidate 9", "Candidate 2", "Candidate 5"]);
    }
}
