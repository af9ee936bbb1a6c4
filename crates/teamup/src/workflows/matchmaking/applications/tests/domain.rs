use super::common::*;
use crate::workflows::matchmaking::applications::domain::{
    ApplicationStatus, Decision, StatusBoardView,
};

#[test]
fn partition_places_every_applicant_in_exactly_one_group() {
    let applicants = pending_roster();
    let total = applicants.len();
    let view = StatusBoardView::partition(applicants);
    let counts = view.counts();

    assert_eq!(counts.total(), total);
    assert_eq!(counts.pending, 2);
    assert_eq!(counts.accepted, 1);
    assert_eq!(counts.rejected, 0);
}

#[test]
fn decisions_map_to_their_target_status() {
    assert_eq!(
        Decision::Accepted.target_status(),
        ApplicationStatus::Accepted
    );
    assert_eq!(
        Decision::Rejected.target_status(),
        ApplicationStatus::Rejected
    );
}

#[test]
fn average_review_score_is_none_without_reviews() {
    let mut subject = applicant(7, "s-2999", ApplicationStatus::Pending);
    subject.past_reviews.clear();
    assert_eq!(subject.average_review_score(), None);
    assert_eq!(subject.review_count(), 0);
}

#[test]
fn average_review_score_averages_all_reviews() {
    use crate::workflows::matchmaking::applications::PastReview;

    let mut subject = applicant(7, "s-2999", ApplicationStatus::Pending);
    subject.past_reviews = vec![
        PastReview {
            score: 3,
            comment: "Solid work".to_string(),
        },
        PastReview {
            score: 5,
            comment: "Carried the final sprint".to_string(),
        },
    ];

    assert_eq!(subject.average_review_score(), Some(4.0));
    assert_eq!(subject.review_count(), 2);
}

#[test]
fn status_serializes_with_wire_casing() {
    let json = serde_json::to_string(&ApplicationStatus::Pending).expect("serializes");
    assert_eq!(json, "\"Pending\"");
    let decision: Decision = serde_json::from_str("\"Accepted\"").expect("deserializes");
    assert_eq!(decision, Decision::Accepted);
}
