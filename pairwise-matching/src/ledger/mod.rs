pub mod memory;
pub mod pair_lock;

use uuid::Uuid;

use pairwise_shared::types::{PairKey, ProfileId};
use pairwise_shared::AppResult;

use crate::models::{Like, LikeStatus, Match, MatchStatus};

pub use memory::{MemoryLikeLedger, MemoryMatchLedger, MemoryProfileDirectory};
pub use pair_lock::PairLocks;

/// Read/write access to Like records. Implementations back this with durable
/// storage; the in-memory ledger in [`memory`] is the reference for the
/// contracts below.
pub trait LikeLedger: Send + Sync {
    fn find_by_id(&self, id: Uuid) -> AppResult<Option<Like>>;

    /// The most recently created like for the ordered (liker, liked) pair,
    /// whatever its status.
    fn latest_directed(&self, liker: &ProfileId, liked: &ProfileId) -> AppResult<Option<Like>>;

    fn insert(&self, like: Like) -> AppResult<Like>;

    /// Compare-and-swap on status. Fails `LikeNotFound` if the id is unknown
    /// and `FailedPrecondition` if the current status is not `expected`, so
    /// two concurrent writers cannot both apply the same transition.
    fn transition(&self, id: Uuid, expected: LikeStatus, next: LikeStatus) -> AppResult<Like>;
}

/// Read/write access to Match records.
pub trait MatchLedger: Send + Sync {
    fn find_by_id(&self, id: Uuid) -> AppResult<Option<Match>>;

    /// The match for this canonical pair whose status is still active
    /// (Initiated or Accepted), if any. At most one can exist.
    fn find_active_by_pair(&self, pair: &PairKey) -> AppResult<Option<Match>>;

    /// Fails `AlreadyMatched` if an active match already exists for the
    /// record's canonical pair. This is the uniqueness constraint that makes
    /// concurrent mutual completions of the same pair converge on one match.
    fn insert(&self, m: Match) -> AppResult<Match>;

    /// Compare-and-swap on status, as in [`LikeLedger::transition`].
    fn transition(&self, id: Uuid, expected: MatchStatus, next: MatchStatus) -> AppResult<Match>;
}
