use pairwise_shared::types::{ActorId, ProfileId};
use pairwise_shared::AppResult;

/// Maps an authenticated actor to their matchmaking profile. Owned by the
/// profile directory collaborator; the engine only asks two questions.
pub trait ProfileResolver: Send + Sync {
    /// The profile owned by this actor. Fails `ProfileNotFound` when the
    /// actor has no profile yet.
    fn resolve(&self, actor: &ActorId) -> AppResult<ProfileId>;

    fn profile_exists(&self, profile: &ProfileId) -> AppResult<bool>;
}
