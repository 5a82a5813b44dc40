mod available;
mod description;
mod id;
mod name;

pub use self::{available::*, description::*, id::*, name::*};
use crate::entity::{RequestId, UserId};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Destructure, References)]
pub struct Item {
    id: ItemId,
    owner_id: UserId,
    name: ItemName,
    description: ItemDescription,
    available: IsAvailable,
    request_id: Option<RequestId>,
}

impl Item {
    pub fn new(
        id: ItemId,
        owner_id: UserId,
        name: ItemName,
        description: ItemDescription,
        available: IsAvailable,
        request_id: Option<RequestId>,
    ) -> Self {
        Self {
            id,
            owner_id,
            name,
            description,
            available,
            request_id,
        }
    }

    /// Single ownership predicate shared by the booking rules and item updates.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }
}
