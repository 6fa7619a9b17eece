//! Cross-feed deduplication

use std::collections::HashSet;

use crate::data::JobListing;

/// Keeps the first listing for each link and drops later duplicates
///
/// Links are compared trimmed and case-insensitively. Input order decides
/// which copy survives, so callers must concatenate feeds in configured order.
pub fn dedupe_by_link(jobs: Vec<JobListing>) -> Vec<JobListing> {
    let mut seen = HashSet::with_capacity(jobs.len());
    jobs.into_iter()
        .filter(|job| seen.insert(job.dedup_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, link: &str, source: &str) -> JobListing {
        JobListing {
            title: title.to_string(),
            link: link.to_string(),
            description: String::new(),
            pub_date: None,
            source: source.to_string(),
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let jobs = vec![
            job("Backend Engineer", "https://x.example/42", "feed-a"),
            job("Designer", "https://x.example/7", "feed-a"),
            job("Backend Engineer", "https://x.example/42", "feed-b"),
        ];

        let deduped = dedupe_by_link(jobs);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].source, "feed-a");
        assert_eq!(deduped[1].title, "Designer");
    }

    #[test]
    fn test_links_compared_trimmed_and_case_insensitive() {
        let jobs = vec![
            job("A", "https://X.example/1", "feed-a"),
            job("A again", "  https://x.example/1  ", "feed-b"),
        ];

        let deduped = dedupe_by_link(jobs);

        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].title, "A");
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let jobs = vec![
            job("A", "https://x.example/1", "feed-a"),
            job("B", "https://x.example/2", "feed-a"),
            job("A", "https://x.example/1", "feed-b"),
            job("C", "https://x.example/3", "feed-b"),
        ];

        let once = dedupe_by_link(jobs);
        let twice = dedupe_by_link(once.clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedupe_by_link(Vec::new()).is_empty());
    }
}
