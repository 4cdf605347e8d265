//! In-process build authority used by the headless session.

use farmstead_core::authority::{AuthorityError, BuildAuthority, BuildRequest};
use farmstead_core::{House, HouseId};

/// Authority double that keeps the player's houses in memory.
///
/// Behaves like the remote system of record: it allocates identifiers,
/// refuses double-booked cells, and answers reloads from its own state.
#[derive(Clone, Debug, Default)]
pub struct LocalAuthority {
    houses: Vec<House>,
    next_id: u32,
}

impl LocalAuthority {
    /// Creates an authority with no recorded houses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an authority pre-seeded with existing houses.
    #[must_use]
    pub fn with_houses(houses: Vec<House>) -> Self {
        let next_id = houses.len() as u32;
        Self { houses, next_id }
    }

    fn allocate_id(&mut self) -> HouseId {
        let id = HouseId::new(format!("h{}", self.next_id));
        self.next_id += 1;
        id
    }
}

impl BuildAuthority for LocalAuthority {
    fn fetch_houses(&mut self) -> Result<Vec<House>, AuthorityError> {
        Ok(self.houses.clone())
    }

    fn build_house(&mut self, request: &BuildRequest) -> Result<House, AuthorityError> {
        if self.houses.iter().any(|house| house.cell == request.cell) {
            return Err(AuthorityError::Rejected(format!(
                "cell {} is already booked",
                request.cell.get(),
            )));
        }

        let house = House {
            id: self.allocate_id(),
            kind: request.kind,
            level: 1,
            skin: request.skin.clone(),
            cell: request.cell,
        };
        self.houses.push(house.clone());
        Ok(house)
    }
}
