pub mod engine;
pub mod ledger;
pub mod models;
pub mod resolver;
pub mod service;

pub use engine::{LikeEngine, MatchEngine};
pub use ledger::{LikeLedger, MatchLedger};
pub use models::{Like, LikeStatus, Match, MatchOrigin, MatchStatus};
pub use resolver::ProfileResolver;
pub use service::MatchmakingService;

pub use pairwise_shared::{AppError, AppResult, ErrorCode};
