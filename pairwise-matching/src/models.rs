use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pairwise_shared::types::{PairKey, ProfileId};

// --- LikeStatus ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeStatus {
    Initiated,
    Completed,
    Cancelled,
}

impl LikeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for LikeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- MatchStatus ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Initiated,
    Accepted,
    Rejected,
    Ended,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Ended => "ended",
        }
    }

    /// Rejected and Ended have no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Ended)
    }

    /// An active match blocks re-liking and new matches for its pair.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Initiated | Self::Accepted)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Like ---

/// One profile's expressed interest in another. Likes are never deleted;
/// they only move between statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub liker_profile_id: ProfileId,
    pub liked_profile_id: ProfileId,
    pub status: LikeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Like {
    pub fn new(liker_profile_id: ProfileId, liked_profile_id: ProfileId, status: LikeStatus) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            liker_profile_id,
            liked_profile_id,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn pair_key(&self) -> PairKey {
        PairKey::new(&self.liker_profile_id, &self.liked_profile_id)
    }
}

// --- Match ---

/// How a match came to exist. Accept/reject authorization depends on it: the
/// receiving side is the profile that did not perform the creating action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOrigin {
    MutualLike { completed_by: ProfileId },
    Invite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    /// Canonical smaller profile id for mutual-like matches; the initiator
    /// for invite matches.
    pub first_profile_id: ProfileId,
    /// Canonical larger profile id for mutual-like matches; the receiver for
    /// invite matches.
    pub second_profile_id: ProfileId,
    pub origin: MatchOrigin,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    /// Materializes a match from established mutual interest. Fields are
    /// stored in canonical order so concurrent completions of {A,B} and
    /// {B,A} address the same logical match.
    pub fn from_mutual_like(a: &ProfileId, b: &ProfileId, completed_by: &ProfileId) -> Self {
        let pair = PairKey::new(a, b);
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_profile_id: pair.first().clone(),
            second_profile_id: pair.second().clone(),
            origin: MatchOrigin::MutualLike { completed_by: completed_by.clone() },
            status: MatchStatus::Initiated,
            created_at: now,
            updated_at: now,
        }
    }

    /// Invite matches keep the roles fixed by who invited whom; no canonical
    /// reordering.
    pub fn from_invite(initiator: &ProfileId, receiver: &ProfileId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_profile_id: initiator.clone(),
            second_profile_id: receiver.clone(),
            origin: MatchOrigin::Invite,
            status: MatchStatus::Initiated,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn pair_key(&self) -> PairKey {
        PairKey::new(&self.first_profile_id, &self.second_profile_id)
    }

    pub fn is_participant(&self, profile: &ProfileId) -> bool {
        &self.first_profile_id == profile || &self.second_profile_id == profile
    }

    /// The profile authorized to accept or reject: the side that did not
    /// perform the action that created this match.
    pub fn receiver(&self) -> &ProfileId {
        match &self.origin {
            MatchOrigin::Invite => &self.second_profile_id,
            MatchOrigin::MutualLike { completed_by } => {
                if completed_by == &self.first_profile_id {
                    &self.second_profile_id
                } else {
                    &self.first_profile_id
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> ProfileId {
        ProfileId::from(s)
    }

    #[test]
    fn mutual_like_match_is_canonically_ordered() {
        let m1 = Match::from_mutual_like(&pid("p2"), &pid("p1"), &pid("p2"));
        let m2 = Match::from_mutual_like(&pid("p1"), &pid("p2"), &pid("p1"));
        assert_eq!(m1.first_profile_id, pid("p1"));
        assert_eq!(m1.second_profile_id, pid("p2"));
        assert_eq!(m1.first_profile_id, m2.first_profile_id);
        assert_eq!(m1.second_profile_id, m2.second_profile_id);
    }

    #[test]
    fn invite_match_keeps_roles() {
        let m = Match::from_invite(&pid("zeta"), &pid("alpha"));
        assert_eq!(m.first_profile_id, pid("zeta"));
        assert_eq!(m.second_profile_id, pid("alpha"));
        assert_eq!(m.receiver(), &pid("alpha"));
    }

    #[test]
    fn mutual_like_receiver_is_the_side_that_did_not_complete() {
        let m = Match::from_mutual_like(&pid("p1"), &pid("p2"), &pid("p2"));
        assert_eq!(m.receiver(), &pid("p1"));

        let m = Match::from_mutual_like(&pid("p1"), &pid("p2"), &pid("p1"));
        assert_eq!(m.receiver(), &pid("p2"));
    }

    #[test]
    fn status_classification() {
        assert!(MatchStatus::Initiated.is_active());
        assert!(MatchStatus::Accepted.is_active());
        assert!(!MatchStatus::Rejected.is_active());
        assert!(MatchStatus::Ended.is_terminal());
        assert!(MatchStatus::Rejected.is_terminal());
        assert!(!MatchStatus::Initiated.is_terminal());
    }
}
