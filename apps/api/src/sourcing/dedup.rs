use std::collections::HashSet;

use crate::models::job::NewJobRecord;
use crate::sourcing::source::RawCandidate;
use crate::sourcing::synthesis::SynthesizedJob;

pub const DEFAULT_SALARY_RANGE: &str = "Based on Experience";
pub const DEFAULT_EMPLOYMENT_TYPE: &str = "Not Specified";

/// Drops entries whose exact (title, company) pair is already stored for the
/// user, or already appeared earlier in the same batch.
///
/// Title and company are trimmed here, so the compared key is the stored key.
/// Matching is otherwise exact and case-sensitive.
pub fn filter_new(
    jobs: Vec<SynthesizedJob>,
    existing_keys: &[(String, String)],
) -> Vec<SynthesizedJob> {
    let mut seen: HashSet<(String, String)> = existing_keys.iter().cloned().collect();
    jobs.into_iter()
        .map(|mut job| {
            job.title = job.title.trim().to_string();
            job.company = job.company.trim().to_string();
            job
        })
        .filter(|job| seen.insert((job.title.clone(), job.company.clone())))
        .collect()
}

/// Fills the persistence defaults. This is the only place they are applied.
///
/// URL preference: the link of the candidate the entry was rewritten from,
/// then a link the oracle found itself, then empty.
pub fn prepare_records(jobs: Vec<SynthesizedJob>, candidates: &[RawCandidate]) -> Vec<NewJobRecord> {
    jobs.into_iter()
        .map(|job| {
            let candidate_link = job
                .source_ref
                .and_then(|r| r.checked_sub(1))
                .and_then(|idx| candidates.get(idx))
                .and_then(|c| c.link.clone());
            let url = candidate_link
                .or_else(|| job.url.clone().filter(|u| !u.trim().is_empty()))
                .unwrap_or_default();

            NewJobRecord {
                title: job.title,
                company: job.company,
                description: job.description,
                url,
                salary_range: or_default(job.salary_range, DEFAULT_SALARY_RANGE),
                employment_type: or_default(job.employment_type, DEFAULT_EMPLOYMENT_TYPE),
            }
        })
        .collect()
}

fn or_default(value: Option<String>, fallback: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
