use serde::{Deserialize, Serialize};

use crate::workflows::matchmaking::domain::UserId;

/// Inclusive score bounds for a peer review.
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// One roster entry for a project: the leader plus every accepted applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: UserId,
    pub name: String,
    pub skills: Vec<String>,
    pub is_leader: bool,
}

/// One reviewer's in-progress evaluation of one teammate.
///
/// Exists transiently while being composed; mutation goes through the
/// tracker, which is the only sanctioned entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewDraft {
    score: Option<u8>,
    comment: String,
}

impl ReviewDraft {
    pub fn score(&self) -> Option<u8> {
        self.score
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub(crate) fn set_score(&mut self, score: u8) {
        self.score = Some(score);
    }

    pub(crate) fn set_comment(&mut self, text: String) {
        self.comment = text;
    }

    pub(crate) fn clear(&mut self) {
        self.score = None;
        self.comment.clear();
    }
}

/// Read model for one member's review form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberReviewView {
    pub member: Member,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub comment: String,
    pub submitted: bool,
    pub submitting: bool,
}
