use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use pairwise_shared::types::{ActorId, PairKey, ProfileId};
use pairwise_shared::{AppError, AppResult, ErrorCode};

use crate::models::{Like, LikeStatus, Match, MatchStatus};
use crate::resolver::ProfileResolver;

use super::{LikeLedger, MatchLedger};

// --- MemoryLikeLedger ---

/// In-process Like ledger. Rows are kept in insertion order so the latest
/// like for an ordered pair is simply the last one pushed.
#[derive(Default)]
pub struct MemoryLikeLedger {
    rows: RwLock<Vec<Like>>,
}

impl MemoryLikeLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LikeLedger for MemoryLikeLedger {
    fn find_by_id(&self, id: Uuid) -> AppResult<Option<Like>> {
        let rows = self
            .rows
            .read()
            .map_err(|_| AppError::internal("like ledger lock poisoned"))?;
        Ok(rows.iter().find(|l| l.id == id).cloned())
    }

    fn latest_directed(&self, liker: &ProfileId, liked: &ProfileId) -> AppResult<Option<Like>> {
        let rows = self
            .rows
            .read()
            .map_err(|_| AppError::internal("like ledger lock poisoned"))?;
        Ok(rows
            .iter()
            .rev()
            .find(|l| &l.liker_profile_id == liker && &l.liked_profile_id == liked)
            .cloned())
    }

    fn insert(&self, like: Like) -> AppResult<Like> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| AppError::internal("like ledger lock poisoned"))?;
        rows.push(like.clone());
        Ok(like)
    }

    fn transition(&self, id: Uuid, expected: LikeStatus, next: LikeStatus) -> AppResult<Like> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| AppError::internal("like ledger lock poisoned"))?;
        let like = rows
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::new(ErrorCode::LikeNotFound, "like not found"))?;
        if like.status != expected {
            return Err(AppError::failed_precondition(format!(
                "like is {}, expected {}",
                like.status, expected
            )));
        }
        like.status = next;
        like.updated_at = Utc::now();
        Ok(like.clone())
    }
}

// --- MemoryMatchLedger ---

#[derive(Default)]
pub struct MemoryMatchLedger {
    rows: RwLock<Vec<Match>>,
}

impl MemoryMatchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All matches ever recorded for a canonical pair, active or not.
    pub fn all_by_pair(&self, pair: &PairKey) -> AppResult<Vec<Match>> {
        let rows = self
            .rows
            .read()
            .map_err(|_| AppError::internal("match ledger lock poisoned"))?;
        Ok(rows.iter().filter(|m| &m.pair_key() == pair).cloned().collect())
    }
}

impl MatchLedger for MemoryMatchLedger {
    fn find_by_id(&self, id: Uuid) -> AppResult<Option<Match>> {
        let rows = self
            .rows
            .read()
            .map_err(|_| AppError::internal("match ledger lock poisoned"))?;
        Ok(rows.iter().find(|m| m.id == id).cloned())
    }

    fn find_active_by_pair(&self, pair: &PairKey) -> AppResult<Option<Match>> {
        let rows = self
            .rows
            .read()
            .map_err(|_| AppError::internal("match ledger lock poisoned"))?;
        Ok(rows
            .iter()
            .find(|m| m.status.is_active() && &m.pair_key() == pair)
            .cloned())
    }

    fn insert(&self, m: Match) -> AppResult<Match> {
        // Conflict check and push under one write lock, so two concurrent
        // inserts for the same pair cannot both pass the check.
        let mut rows = self
            .rows
            .write()
            .map_err(|_| AppError::internal("match ledger lock poisoned"))?;
        let pair = m.pair_key();
        if rows.iter().any(|r| r.status.is_active() && r.pair_key() == pair) {
            return Err(AppError::new(
                ErrorCode::AlreadyMatched,
                format!("an active match already exists for pair {pair}"),
            ));
        }
        rows.push(m.clone());
        Ok(m)
    }

    fn transition(&self, id: Uuid, expected: MatchStatus, next: MatchStatus) -> AppResult<Match> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| AppError::internal("match ledger lock poisoned"))?;
        let m = rows
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::new(ErrorCode::MatchNotFound, "match not found"))?;
        if m.status != expected {
            return Err(AppError::failed_precondition(format!(
                "match is {}, expected {}",
                m.status, expected
            )));
        }
        m.status = next;
        m.updated_at = Utc::now();
        Ok(m.clone())
    }
}

// --- MemoryProfileDirectory ---

/// Actor -> profile mapping for embedding and tests. Each actor owns at most
/// one profile.
#[derive(Default)]
pub struct MemoryProfileDirectory {
    profiles: RwLock<HashMap<ActorId, ProfileId>>,
}

impl MemoryProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, actor: ActorId, profile: ProfileId) {
        if let Ok(mut profiles) = self.profiles.write() {
            profiles.insert(actor, profile);
        }
    }
}

impl ProfileResolver for MemoryProfileDirectory {
    fn resolve(&self, actor: &ActorId) -> AppResult<ProfileId> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| AppError::internal("profile directory lock poisoned"))?;
        profiles
            .get(actor)
            .cloned()
            .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))
    }

    fn profile_exists(&self, profile: &ProfileId) -> AppResult<bool> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| AppError::internal("profile directory lock poisoned"))?;
        Ok(profiles.values().any(|p| p == profile))
    }
}
