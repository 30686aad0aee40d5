use std::fmt;

use serde::{Deserialize, Serialize};

// --- ActorId ---

/// Opaque identifier for an authenticated caller, as handed over by the
/// identity/session layer. The engine never inspects it beyond emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

// --- ProfileId ---

/// Opaque identifier for a matchmaking profile. Ordering is lexicographic on
/// the underlying string, which is what canonical pair ordering relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

// --- PairKey ---

/// Canonical unordered pair of profiles: the lexicographically smaller id is
/// always `first`, so {A,B} and {B,A} key identically no matter which side
/// acted first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    first: ProfileId,
    second: ProfileId,
}

impl PairKey {
    pub fn new(a: &ProfileId, b: &ProfileId) -> Self {
        if a <= b {
            Self { first: a.clone(), second: b.clone() }
        } else {
            Self { first: b.clone(), second: a.clone() }
        }
    }

    pub fn first(&self) -> &ProfileId {
        &self.first
    }

    pub fn second(&self) -> &ProfileId {
        &self.second
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.second)
    }
}
