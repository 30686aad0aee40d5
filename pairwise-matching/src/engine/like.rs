use std::sync::Arc;

use uuid::Uuid;

use pairwise_shared::types::{PairKey, ProfileId};
use pairwise_shared::{AppError, AppResult, ErrorCode};

use crate::ledger::{LikeLedger, MatchLedger, PairLocks};
use crate::models::{Like, LikeStatus, Match};

use super::MatchEngine;

/// Owns the like state machine: initiate, cancel, explicit completion, and
/// mutual-completion detection.
///
/// Every sequence that can complete a like runs under the pair's lock, so
/// two callers racing on the same unordered pair observe each other's writes
/// and exactly one match is created. Within a locked sequence the match
/// insert is ordered first: it is the only fallible step, so a conflict
/// leaves every like at its pre-call state.
pub struct LikeEngine {
    likes: Arc<dyn LikeLedger>,
    matches: Arc<dyn MatchLedger>,
    match_engine: MatchEngine,
    pair_locks: Arc<PairLocks>,
}

impl LikeEngine {
    pub fn new(
        likes: Arc<dyn LikeLedger>,
        matches: Arc<dyn MatchLedger>,
        pair_locks: Arc<PairLocks>,
    ) -> Self {
        let match_engine = MatchEngine::new(matches.clone());
        Self { likes, matches, match_engine, pair_locks }
    }

    /// Fresh expression of interest. Completes both sides and materializes
    /// the match when the reverse like is already waiting; otherwise records
    /// an initiated like.
    pub fn initiate_or_complete(&self, liker: &ProfileId, liked: &ProfileId) -> AppResult<Like> {
        if liker == liked {
            return Err(AppError::new(ErrorCode::SelfLike, "cannot like your own profile"));
        }

        let pair = PairKey::new(liker, liked);
        let slot = self.pair_locks.slot(&pair)?;
        let _guard = slot
            .lock()
            .map_err(|_| AppError::internal(format!("pair lock poisoned for {pair}")))?;

        if let Some(existing) = self.likes.latest_directed(liker, liked)? {
            match existing.status {
                LikeStatus::Initiated => {
                    return Err(AppError::new(ErrorCode::AlreadyRequested, "like already sent"));
                }
                LikeStatus::Completed => {
                    if self.matches.find_active_by_pair(&pair)?.is_some() {
                        return Err(AppError::with_details(
                            ErrorCode::AlreadyMatched,
                            format!("an active match already exists for pair {pair}"),
                            serde_json::json!({ "pair": pair.to_string() }),
                        ));
                    }
                    // The match this like produced has since ended or been
                    // rejected; the pair may like each other again.
                }
                LikeStatus::Cancelled => {}
            }
        }

        let reverse = self.likes.latest_directed(liked, liker)?;
        if let Some(rev) = reverse.filter(|r| r.status == LikeStatus::Initiated) {
            let created = self.match_engine.create_from_mutual_like(liker, liked, liker)?;
            self.likes
                .transition(rev.id, LikeStatus::Initiated, LikeStatus::Completed)?;
            let like = self
                .likes
                .insert(Like::new(liker.clone(), liked.clone(), LikeStatus::Completed))?;
            tracing::info!(
                like_id = %like.id,
                match_id = %created.id,
                pair = %pair,
                "mutual like completed"
            );
            return Ok(like);
        }

        let like = self
            .likes
            .insert(Like::new(liker.clone(), liked.clone(), LikeStatus::Initiated))?;
        tracing::info!(like_id = %like.id, liker = %liker, liked = %liked, "like initiated");
        Ok(like)
    }

    /// Explicit completion by the liked party. Flips the like (and its
    /// reverse, created on the spot when the liked side never sent one) to
    /// completed and materializes the match.
    pub fn complete(&self, like_id: Uuid, actor: &ProfileId) -> AppResult<(Like, Match)> {
        let like = self
            .likes
            .find_by_id(like_id)?
            .ok_or_else(|| AppError::new(ErrorCode::LikeNotFound, "like not found"))?;

        if &like.liked_profile_id != actor {
            return Err(AppError::permission_denied(
                "only the liked profile can complete a like",
            ));
        }

        let pair = like.pair_key();
        let slot = self.pair_locks.slot(&pair)?;
        let _guard = slot
            .lock()
            .map_err(|_| AppError::internal(format!("pair lock poisoned for {pair}")))?;

        // Re-read under the lock; the status may have moved while we waited.
        let like = self
            .likes
            .find_by_id(like_id)?
            .ok_or_else(|| AppError::new(ErrorCode::LikeNotFound, "like not found"))?;
        if like.status != LikeStatus::Initiated {
            return Err(AppError::failed_precondition(format!(
                "like is {}, expected initiated",
                like.status
            )));
        }

        let created = self.match_engine.create_from_mutual_like(
            &like.liker_profile_id,
            &like.liked_profile_id,
            actor,
        )?;

        let completed = self
            .likes
            .transition(like.id, LikeStatus::Initiated, LikeStatus::Completed)?;

        let reverse = self
            .likes
            .latest_directed(&like.liked_profile_id, &like.liker_profile_id)?;
        match reverse {
            Some(rev) if rev.status == LikeStatus::Initiated => {
                self.likes
                    .transition(rev.id, LikeStatus::Initiated, LikeStatus::Completed)?;
            }
            _ => {
                // Completing is itself an expression of interest: record the
                // reverse like directly in completed status.
                self.likes.insert(Like::new(
                    like.liked_profile_id.clone(),
                    like.liker_profile_id.clone(),
                    LikeStatus::Completed,
                ))?;
            }
        }

        tracing::info!(
            like_id = %completed.id,
            match_id = %created.id,
            pair = %pair,
            "like completed"
        );
        Ok((completed, created))
    }

    /// Only the liker can withdraw an initiated like. Runs under the pair
    /// lock: a cancel slipping between a completing sequence's status check
    /// and its like flip would strand the freshly inserted match.
    pub fn cancel(&self, like_id: Uuid, actor: &ProfileId) -> AppResult<Like> {
        let like = self
            .likes
            .find_by_id(like_id)?
            .ok_or_else(|| AppError::new(ErrorCode::LikeNotFound, "like not found"))?;

        if &like.liker_profile_id != actor {
            return Err(AppError::permission_denied("only the liker can cancel a like"));
        }

        let pair = like.pair_key();
        let slot = self.pair_locks.slot(&pair)?;
        let _guard = slot
            .lock()
            .map_err(|_| AppError::internal(format!("pair lock poisoned for {pair}")))?;

        // Re-read under the lock; a completion may have won the pair first.
        let like = self
            .likes
            .find_by_id(like_id)?
            .ok_or_else(|| AppError::new(ErrorCode::LikeNotFound, "like not found"))?;
        if like.status != LikeStatus::Initiated {
            return Err(AppError::failed_precondition(format!(
                "like is {}, expected initiated",
                like.status
            )));
        }

        let updated = self
            .likes
            .transition(like_id, LikeStatus::Initiated, LikeStatus::Cancelled)?;
        tracing::info!(like_id = %like_id, "like cancelled");
        Ok(updated)
    }
}
