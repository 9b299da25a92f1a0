use crate::models::{Candidate, MatchWeights, ScoredCandidate, ServiceRequest};
use crate::core::scoring::calculate_priority;

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub scored: Vec<ScoredCandidate>,
    pub total_candidates: usize,
}

/// Ranks the masters offering a service against a service request
///
/// Every candidate is kept, including those scoring zero. Candidates are
/// evaluated independently of each other.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: MatchWeights,
}

impl Matcher {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: MatchWeights::default(),
        }
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    /// Score all candidates for a request
    ///
    /// # Returns
    /// MatchResult with one entry per candidate, highest priority first and
    /// ties broken by offering id
    pub fn rank(&self, request: &ServiceRequest, candidates: Vec<Candidate>) -> MatchResult {
        let total_candidates = candidates.len();

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|candidate| {
                let (priority, criteria) = calculate_priority(request, &candidate, &self.weights);
                ScoredCandidate {
                    candidate,
                    criteria,
                    priority,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.candidate.offering_id.cmp(&b.candidate.offering_id))
        });

        MatchResult {
            scored,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn create_candidate(offering_id: i64, sub_region_id: i64, region_id: i64, is_main: bool) -> Candidate {
        Candidate {
            offering_id,
            master_id: offering_id * 10,
            sub_region_id,
            region_id,
            is_main,
            gender_id: Some(1),
        }
    }

    fn create_request() -> ServiceRequest {
        ServiceRequest {
            id: 7,
            user_id: 1,
            service_id: 3,
            sub_region_id: 11,
            region_id: 1,
            preferred_master_gender_id: Some(2),
            expired_at: Utc::now() + Duration::hours(1),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_rank_keeps_zero_scores() {
        let matcher = Matcher::with_default_weights();
        let candidates = vec![
            create_candidate(1, 99, 9, false),
            create_candidate(2, 98, 9, false),
        ];

        let result = matcher.rank(&create_request(), candidates);

        assert_eq!(result.total_candidates, 2);
        assert_eq!(result.scored.len(), 2);
        assert!(result.scored.iter().all(|s| s.priority == 0));
    }

    #[test]
    fn test_rank_sorted_by_priority() {
        let matcher = Matcher::with_default_weights();
        let candidates = vec![
            create_candidate(1, 99, 9, false), // 0
            create_candidate(2, 11, 1, true),  // 4
            create_candidate(3, 12, 1, false), // 1
            create_candidate(4, 11, 1, false), // 3
        ];

        let result = matcher.rank(&create_request(), candidates);
        let order: Vec<i64> = result.scored.iter().map(|s| s.candidate.offering_id).collect();
        let priorities: Vec<u32> = result.scored.iter().map(|s| s.priority).collect();

        assert_eq!(order, vec![2, 4, 3, 1]);
        assert_eq!(priorities, vec![4, 3, 1, 0]);
    }

    #[test]
    fn test_ties_broken_by_offering_id() {
        let matcher = Matcher::with_default_weights();
        let candidates = vec![
            create_candidate(9, 11, 1, false),
            create_candidate(3, 11, 1, false),
        ];

        let result = matcher.rank(&create_request(), candidates);

        assert_eq!(result.scored[0].candidate.offering_id, 3);
        assert_eq!(result.scored[1].candidate.offering_id, 9);
    }

    #[test]
    fn test_empty_candidates() {
        let matcher = Matcher::default();
        let result = matcher.rank(&create_request(), vec![]);

        assert_eq!(result.total_candidates, 0);
        assert!(result.scored.is_empty());
    }
}
