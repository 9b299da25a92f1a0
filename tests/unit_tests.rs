// Unit tests for the Bestgo scoring core

use bestgo::core::{calculate_priority, evaluate_criteria, Matcher};
use bestgo::models::{Candidate, MatchWeights, ServiceRequest};
use chrono::{Duration, Utc};

const MALE: i64 = 1;
const FEMALE: i64 = 2;

const SEOUL: i64 = 1;
const GWANGJIN: i64 = 101;
const MAPO: i64 = 102;
const BUSAN: i64 = 2;
const HAEUNDAE: i64 = 201;

fn seoul_gwangjin_request(gender: Option<i64>) -> ServiceRequest {
    ServiceRequest {
        id: 1,
        user_id: 5,
        service_id: 3,
        sub_region_id: GWANGJIN,
        region_id: SEOUL,
        preferred_master_gender_id: gender,
        expired_at: Utc::now() + Duration::hours(48),
        created_at: Utc::now(),
    }
}

fn candidate(offering_id: i64, sub_region_id: i64, region_id: i64, is_main: bool, gender: Option<i64>) -> Candidate {
    Candidate {
        offering_id,
        master_id: offering_id + 1000,
        sub_region_id,
        region_id,
        is_main,
        gender_id: gender,
    }
}

/// Every combination of criteria the fixtures can express
fn all_candidates() -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let mut id = 0;
    for (sub_region, region) in [(GWANGJIN, SEOUL), (MAPO, SEOUL), (HAEUNDAE, BUSAN)] {
        for is_main in [true, false] {
            for gender in [Some(MALE), Some(FEMALE), None] {
                id += 1;
                candidates.push(candidate(id, sub_region, region, is_main, gender));
            }
        }
    }
    candidates
}

#[test]
fn test_reference_pair() {
    let request = seoul_gwangjin_request(Some(MALE));
    let weights = MatchWeights::default();

    let a = candidate(1, GWANGJIN, SEOUL, true, Some(MALE));
    let b = candidate(2, HAEUNDAE, BUSAN, false, Some(FEMALE));

    assert_eq!(calculate_priority(&request, &a, &weights).0, 5);
    assert_eq!(calculate_priority(&request, &b, &weights).0, 0);
}

#[test]
fn test_priority_bounds() {
    let weights = MatchWeights::default();

    for gender in [Some(MALE), Some(FEMALE), None] {
        let request = seoul_gwangjin_request(gender);
        for c in all_candidates() {
            let (priority, _) = calculate_priority(&request, &c, &weights);
            assert!(priority <= 5, "priority {} exceeds maximum for {:?}", priority, c);
        }
    }
}

#[test]
fn test_sub_region_match_implies_region_bonus() {
    let request = seoul_gwangjin_request(None);

    for c in all_candidates() {
        let criteria = evaluate_criteria(&request, &c);
        if criteria.same_sub_region {
            assert!(criteria.same_region, "local candidate {:?} missed regional bonus", c);
        }
    }
}

#[test]
fn test_local_candidate_gets_both_location_bonuses() {
    let request = seoul_gwangjin_request(None);
    let weights = MatchWeights::default();

    let local = candidate(1, GWANGJIN, SEOUL, false, None);
    let same_region = candidate(2, MAPO, SEOUL, false, None);

    assert_eq!(calculate_priority(&request, &local, &weights).0, 3);
    assert_eq!(calculate_priority(&request, &same_region, &weights).0, 1);
}

#[test]
fn test_main_service_bonus() {
    let request = seoul_gwangjin_request(None);
    let weights = MatchWeights::default();

    let main = candidate(1, HAEUNDAE, BUSAN, true, None);
    let secondary = candidate(2, HAEUNDAE, BUSAN, false, None);

    assert_eq!(calculate_priority(&request, &main, &weights).0, 1);
    assert_eq!(calculate_priority(&request, &secondary, &weights).0, 0);
}

#[test]
fn test_gender_bonus_requires_preference() {
    let weights = MatchWeights::default();
    let male = candidate(1, HAEUNDAE, BUSAN, false, Some(MALE));

    let with_preference = seoul_gwangjin_request(Some(MALE));
    let without_preference = seoul_gwangjin_request(None);

    assert_eq!(calculate_priority(&with_preference, &male, &weights).0, 1);
    assert_eq!(calculate_priority(&without_preference, &male, &weights).0, 0);
}

#[test]
fn test_matcher_scores_every_candidate() {
    let matcher = Matcher::with_default_weights();
    let request = seoul_gwangjin_request(Some(FEMALE));
    let candidates = all_candidates();
    let total = candidates.len();

    let result = matcher.rank(&request, candidates);

    assert_eq!(result.total_candidates, total);
    assert_eq!(result.scored.len(), total);
    assert!(result.scored.iter().any(|s| s.priority == 0));
    assert_eq!(result.scored[0].priority, 5);
    for pair in result.scored.windows(2) {
        assert!(pair[0].priority >= pair[1].priority);
    }
}
