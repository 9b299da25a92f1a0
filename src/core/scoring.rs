use crate::models::{Candidate, MatchCriteria, MatchWeights, ServiceRequest};

/// Evaluate each matching criterion independently
///
/// Criteria:
/// - same_sub_region:  candidate's home sub-region is the requested one
/// - same_region:      candidate's parent region is the requested one
/// - main_service:     the offering is the master's main service
/// - preferred_gender: master's gender equals the requested gender
///
/// The sub-region and region checks do not short-circuit each other, so a
/// local candidate satisfies both.
#[inline]
pub fn evaluate_criteria(request: &ServiceRequest, candidate: &Candidate) -> MatchCriteria {
    let preferred_gender = match (request.preferred_master_gender_id, candidate.gender_id) {
        (Some(preferred), Some(gender)) => preferred == gender,
        _ => false,
    };

    MatchCriteria {
        same_sub_region: candidate.sub_region_id == request.sub_region_id,
        same_region: candidate.region_id == request.region_id,
        main_service: candidate.is_main,
        preferred_gender,
    }
}

/// Sum the weights of the satisfied criteria
///
/// Weights are unsigned, so the result is never negative.
#[inline]
pub fn priority_for(criteria: &MatchCriteria, weights: &MatchWeights) -> u32 {
    let award = |hit: bool, points: u16| if hit { u32::from(points) } else { 0 };

    award(criteria.same_sub_region, weights.same_sub_region)
        + award(criteria.same_region, weights.same_region)
        + award(criteria.main_service, weights.main_service)
        + award(criteria.preferred_gender, weights.preferred_gender)
}

/// Score a single candidate against a request
pub fn calculate_priority(
    request: &ServiceRequest,
    candidate: &Candidate,
    weights: &MatchWeights,
) -> (u32, MatchCriteria) {
    let criteria = evaluate_criteria(request, candidate);
    (priority_for(&criteria, weights), criteria)
}
