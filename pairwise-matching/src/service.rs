use std::sync::Arc;

use uuid::Uuid;

use pairwise_shared::types::{ActorId, ProfileId};
use pairwise_shared::{AppError, AppResult, ErrorCode};

use crate::engine::{LikeEngine, MatchEngine};
use crate::ledger::{LikeLedger, MatchLedger, PairLocks};
use crate::models::{Like, Match};
use crate::resolver::ProfileResolver;

/// The public face of the matchmaking engine. Resolves the calling actor to
/// their profile, then delegates to the like and match engines.
///
/// "You have no profile yet" (`ProfileNotFound`) is kept distinct from "that
/// like/match does not exist" (`LikeNotFound`/`MatchNotFound`) so callers can
/// disambiguate.
pub struct MatchmakingService {
    resolver: Arc<dyn ProfileResolver>,
    like_engine: LikeEngine,
    match_engine: MatchEngine,
}

impl MatchmakingService {
    pub fn new(
        resolver: Arc<dyn ProfileResolver>,
        likes: Arc<dyn LikeLedger>,
        matches: Arc<dyn MatchLedger>,
    ) -> Self {
        let pair_locks = Arc::new(PairLocks::new());
        Self {
            resolver,
            like_engine: LikeEngine::new(likes, matches.clone(), pair_locks),
            match_engine: MatchEngine::new(matches),
        }
    }

    fn resolve_actor(&self, actor: &ActorId) -> AppResult<ProfileId> {
        if actor.is_empty() {
            return Err(AppError::unauthenticated("no authenticated actor"));
        }
        self.resolver.resolve(actor)
    }

    /// Express interest in another profile. Returns the like, initiated or
    /// (when interest turns out to be mutual) completed.
    pub fn send_like(&self, actor: &ActorId, liked: &ProfileId) -> AppResult<Like> {
        let liker = self.resolve_actor(actor)?;
        if !self.resolver.profile_exists(liked)? {
            return Err(AppError::new(ErrorCode::ProfileNotFound, "liked profile not found"));
        }
        self.like_engine.initiate_or_complete(&liker, liked)
    }

    /// The liked party completes a like sent to them, creating the match.
    pub fn complete_like(&self, actor: &ActorId, like_id: Uuid) -> AppResult<(Like, Match)> {
        let profile = self.resolve_actor(actor)?;
        self.like_engine.complete(like_id, &profile)
    }

    pub fn cancel_like(&self, actor: &ActorId, like_id: Uuid) -> AppResult<Like> {
        let profile = self.resolve_actor(actor)?;
        self.like_engine.cancel(like_id, &profile)
    }

    /// Privileged path: an administrator pairs two named profiles directly,
    /// so both sides are validated rather than resolved from the caller.
    pub fn create_invite(&self, initiator: &ProfileId, receiver: &ProfileId) -> AppResult<Match> {
        if initiator.is_empty() || receiver.is_empty() {
            return Err(AppError::invalid_argument(
                "initiator and receiver profile ids are required",
            ));
        }
        if !self.resolver.profile_exists(initiator)? {
            return Err(AppError::new(
                ErrorCode::ProfileNotFound,
                "initiator profile not found",
            ));
        }
        if !self.resolver.profile_exists(receiver)? {
            return Err(AppError::new(
                ErrorCode::ProfileNotFound,
                "receiver profile not found",
            ));
        }
        self.match_engine.create_from_invite(initiator, receiver)
    }

    pub fn accept_match(&self, actor: &ActorId, match_id: Uuid) -> AppResult<Match> {
        let profile = self.resolve_actor(actor)?;
        self.match_engine.accept(match_id, &profile)
    }

    pub fn reject_match(&self, actor: &ActorId, match_id: Uuid) -> AppResult<Match> {
        let profile = self.resolve_actor(actor)?;
        self.match_engine.reject(match_id, &profile)
    }

    pub fn end_match(&self, actor: &ActorId, match_id: Uuid) -> AppResult<Match> {
        let profile = self.resolve_actor(actor)?;
        self.match_engine.end(match_id, &profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{MemoryLikeLedger, MemoryMatchLedger, MemoryProfileDirectory};

    fn pid(s: &str) -> ProfileId {
        ProfileId::from(s)
    }

    fn service_with(users: &[(&str, &str)]) -> MatchmakingService {
        let directory = MemoryProfileDirectory::new();
        for (actor, profile) in users {
            directory.register(ActorId::from(*actor), pid(profile));
        }
        MatchmakingService::new(
            Arc::new(directory),
            Arc::new(MemoryLikeLedger::new()),
            Arc::new(MemoryMatchLedger::new()),
        )
    }

    #[test]
    fn empty_actor_is_unauthenticated() {
        let service = service_with(&[("u1", "p1")]);
        let err = service.send_like(&ActorId::from(""), &pid("p1")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthenticated);
    }

    #[test]
    fn actor_without_profile_is_profile_not_found() {
        let service = service_with(&[("u1", "p1")]);
        let err = service.send_like(&ActorId::from("u2"), &pid("p1")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProfileNotFound);
    }

    #[test]
    fn liking_an_unknown_profile_is_profile_not_found() {
        let service = service_with(&[("u1", "p1")]);
        let err = service.send_like(&ActorId::from("u1"), &pid("ghost")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProfileNotFound);
    }

    #[test]
    fn unknown_like_id_stays_like_not_found() {
        // Distinct from the no-profile case above.
        let service = service_with(&[("u1", "p1")]);
        let err = service
            .cancel_like(&ActorId::from("u1"), Uuid::new_v4())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::LikeNotFound);
    }

    #[test]
    fn invite_validates_both_profiles() {
        let service = service_with(&[("u1", "p1"), ("u2", "p2")]);

        let err = service.create_invite(&pid(""), &pid("p2")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        let err = service.create_invite(&pid("ghost"), &pid("p2")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProfileNotFound);
        let err = service.create_invite(&pid("p1"), &pid("ghost")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProfileNotFound);

        let m = service.create_invite(&pid("p1"), &pid("p2")).unwrap();
        assert_eq!(m.first_profile_id, pid("p1"));
        assert_eq!(m.second_profile_id, pid("p2"));
    }

    #[test]
    fn mutual_likes_flow_end_to_end() {
        let service = service_with(&[("u1", "p1"), ("u2", "p2")]);
        let u1 = ActorId::from("u1");
        let u2 = ActorId::from("u2");

        let first = service.send_like(&u1, &pid("p2")).unwrap();
        assert_eq!(first.status, crate::models::LikeStatus::Initiated);

        let second = service.send_like(&u2, &pid("p1")).unwrap();
        assert_eq!(second.status, crate::models::LikeStatus::Completed);
    }

    #[test]
    fn invite_lifecycle_through_the_service() {
        let service = service_with(&[("u1", "p1"), ("u2", "p2")]);
        let m = service.create_invite(&pid("p1"), &pid("p2")).unwrap();

        let err = service.accept_match(&ActorId::from("u1"), m.id).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PermissionDenied);

        let accepted = service.accept_match(&ActorId::from("u2"), m.id).unwrap();
        assert_eq!(accepted.status, crate::models::MatchStatus::Accepted);

        let ended = service.end_match(&ActorId::from("u1"), m.id).unwrap();
        assert_eq!(ended.status, crate::models::MatchStatus::Ended);
    }
}
