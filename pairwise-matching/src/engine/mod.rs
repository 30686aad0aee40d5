pub mod like;
pub mod matches;

pub use like::LikeEngine;
pub use matches::MatchEngine;
