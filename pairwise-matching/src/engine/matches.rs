use std::sync::Arc;

use uuid::Uuid;

use pairwise_shared::types::ProfileId;
use pairwise_shared::{AppError, AppResult, ErrorCode};

use crate::ledger::MatchLedger;
use crate::models::{Match, MatchStatus};

/// Owns the match state machine: create (from mutual like or direct invite),
/// accept, reject, end.
///
/// ```text
/// Initiated --accept--> Accepted --end--> Ended   (terminal)
/// Initiated --reject--> Rejected                  (terminal)
/// ```
#[derive(Clone)]
pub struct MatchEngine {
    matches: Arc<dyn MatchLedger>,
}

impl MatchEngine {
    pub fn new(matches: Arc<dyn MatchLedger>) -> Self {
        Self { matches }
    }

    /// Materializes a match for a pair whose mutual interest the like engine
    /// has already established. Performs no re-validation of like state. A
    /// concurrent call for the same canonical pair surfaces the ledger's
    /// uniqueness conflict as `AlreadyMatched`.
    pub fn create_from_mutual_like(
        &self,
        a: &ProfileId,
        b: &ProfileId,
        completed_by: &ProfileId,
    ) -> AppResult<Match> {
        let m = self.matches.insert(Match::from_mutual_like(a, b, completed_by))?;
        tracing::info!(match_id = %m.id, pair = %m.pair_key(), "match created from mutual like");
        Ok(m)
    }

    /// Direct-invite variant: no like layer, roles fixed by who invited whom.
    pub fn create_from_invite(&self, initiator: &ProfileId, receiver: &ProfileId) -> AppResult<Match> {
        if initiator.is_empty() || receiver.is_empty() {
            return Err(AppError::invalid_argument(
                "initiator and receiver profile ids are required",
            ));
        }
        if initiator == receiver {
            return Err(AppError::new(
                ErrorCode::SelfInvitation,
                "cannot invite your own profile",
            ));
        }

        let m = self.matches.insert(Match::from_invite(initiator, receiver))?;
        tracing::info!(
            match_id = %m.id,
            initiator = %initiator,
            receiver = %receiver,
            "match created from invite"
        );
        Ok(m)
    }

    pub fn accept(&self, match_id: Uuid, actor: &ProfileId) -> AppResult<Match> {
        self.respond(match_id, actor, MatchStatus::Accepted)
    }

    pub fn reject(&self, match_id: Uuid, actor: &ProfileId) -> AppResult<Match> {
        self.respond(match_id, actor, MatchStatus::Rejected)
    }

    /// Shared accept/reject path: only the receiving side may respond, and
    /// only while the match is still initiated. The final CAS catches a
    /// concurrent response that slipped in after our checks.
    fn respond(&self, match_id: Uuid, actor: &ProfileId, next: MatchStatus) -> AppResult<Match> {
        let m = self
            .matches
            .find_by_id(match_id)?
            .ok_or_else(|| AppError::new(ErrorCode::MatchNotFound, "match not found"))?;

        if !m.is_participant(actor) {
            return Err(AppError::permission_denied("you are not part of this match"));
        }
        if m.receiver() != actor {
            return Err(AppError::permission_denied(
                "only the receiving profile can respond to this match",
            ));
        }
        if m.status != MatchStatus::Initiated {
            return Err(AppError::failed_precondition(format!(
                "match is {}, expected initiated",
                m.status
            )));
        }

        let updated = self.matches.transition(match_id, MatchStatus::Initiated, next)?;
        tracing::info!(match_id = %match_id, status = %updated.status, "match responded");
        Ok(updated)
    }

    /// Either participant can end an accepted match.
    pub fn end(&self, match_id: Uuid, actor: &ProfileId) -> AppResult<Match> {
        let m = self
            .matches
            .find_by_id(match_id)?
            .ok_or_else(|| AppError::new(ErrorCode::MatchNotFound, "match not found"))?;

        if !m.is_participant(actor) {
            return Err(AppError::permission_denied("you are not part of this match"));
        }
        match m.status {
            MatchStatus::Accepted => {}
            MatchStatus::Initiated => {
                return Err(AppError::failed_precondition("match is initiated, not yet accepted"));
            }
            MatchStatus::Rejected | MatchStatus::Ended => {
                return Err(AppError::failed_precondition(format!(
                    "match is already {}",
                    m.status
                )));
            }
        }

        let updated = self
            .matches
            .transition(match_id, MatchStatus::Accepted, MatchStatus::Ended)?;
        tracing::info!(match_id = %match_id, ended_by = %actor, "match ended");
        Ok(updated)
    }
}
