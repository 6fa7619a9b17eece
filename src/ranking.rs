//! Relevance ranking of job listings against query keywords
//!
//! Keywords are matched as substrings of the lowercased title and
//! description, so "java" also hits "javascript". Each distinct keyword counts
//! once per field: 2 points for the title, 1 for the description.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};

use crate::data::JobListing;

/// Default number of results returned
pub const DEFAULT_LIMIT: usize = 10;

const TITLE_WEIGHT: u32 = 2;
const DESCRIPTION_WEIGHT: u32 = 1;

/// A listing paired with its score for one query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredJob {
    pub job: JobListing,
    pub relevance_score: u32,
}

/// Number of distinct keywords occurring in `text`
fn count_hits(text: &str, keywords: &[String]) -> u32 {
    let text = text.to_lowercase();
    keywords.iter().filter(|k| text.contains(k.as_str())).count() as u32
}

/// Relevance score of a listing, zero when no keyword matches
pub fn relevance_score(job: &JobListing, keywords: &[String]) -> u32 {
    TITLE_WEIGHT * count_hits(&job.title, keywords)
        + DESCRIPTION_WEIGHT * count_hits(&job.description, keywords)
}

/// Scores every listing, dropping those without any keyword hit
pub fn score_jobs(jobs: Vec<JobListing>, keywords: &[String]) -> Vec<ScoredJob> {
    jobs.into_iter()
        .filter_map(|job| {
            let relevance_score = relevance_score(&job, keywords);
            (relevance_score > 0).then_some(ScoredJob {
                job,
                relevance_score,
            })
        })
        .collect()
}

/// Filters, sorts and truncates listings for a keyword set
///
/// Ordering is score descending, then publication date descending with
/// undated listings last. The sort is stable, so full ties keep input order.
pub fn rank(jobs: Vec<JobListing>, keywords: &[String], limit: usize) -> Vec<JobListing> {
    if keywords.is_empty() {
        return Vec::new();
    }

    let mut scored = score_jobs(jobs, keywords);
    scored.sort_by_key(|s| {
        (
            Reverse(s.relevance_score),
            Reverse(s.job.pub_date.unwrap_or(DateTime::<Utc>::MIN_UTC)),
        )
    });

    scored.into_iter().take(limit).map(|s| s.job).collect()
}
