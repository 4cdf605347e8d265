//! Port to the remote build authority.
//!
//! The authority owns every house the player has built; the engine treats it
//! as asynchronous, fallible, and not inherently idempotent. Transport
//! concerns such as idempotency keys and CSRF tokens belong to the adapter
//! implementing this trait, not to the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellIndex, House, HouseKind, SkinId};

/// Structured failures reported by the remote build authority.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AuthorityError {
    /// The authority processed the request and refused it.
    #[error("build authority rejected the request: {0}")]
    Rejected(String),
    /// The authority could not be reached or its answer could not be parsed.
    #[error("could not reach the build authority: {0}")]
    Transport(String),
}

/// Payload submitted to the authority when the player builds a house.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
    /// Category of house to build.
    #[serde(rename = "type")]
    pub kind: HouseKind,
    /// Appearance the player selected.
    pub skin: SkinId,
    /// Cell the house should occupy.
    pub cell: CellIndex,
}

impl BuildRequest {
    /// Creates a new build request payload.
    #[must_use]
    pub const fn new(kind: HouseKind, skin: SkinId, cell: CellIndex) -> Self {
        Self { kind, skin, cell }
    }
}

/// System of record for houses and build outcomes.
pub trait BuildAuthority {
    /// Retrieves every house the player owns.
    fn fetch_houses(&mut self) -> Result<Vec<House>, AuthorityError>;

    /// Submits a build request and returns the committed house.
    fn build_house(&mut self, request: &BuildRequest) -> Result<House, AuthorityError>;
}

#[cfg(test)]
mod tests {
    use super::BuildRequest;
    use crate::{CellIndex, HouseKind, SkinId};

    #[test]
    fn build_request_wire_shape_matches_authority_payload() {
        let request = BuildRequest::new(HouseKind::Farm, SkinId::new("basic"), CellIndex::new(5));
        let encoded = serde_json::to_string(&request).expect("encode request");
        assert_eq!(encoded, r#"{"type":"FARM","skin":"basic","cell":5}"#);
    }
}
