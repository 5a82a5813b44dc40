mod description;
mod id;

pub use self::{description::*, id::*};
use crate::entity::{CreatedAt, UserId};
use destructure::Destructure;
use vodca::References;

/// A posted wish for an item that is not listed yet. Items may be created in
/// answer to one.
#[derive(Debug, Clone, Eq, PartialEq, Destructure, References)]
pub struct RentalRequest {
    id: RequestId,
    requester_id: UserId,
    description: RequestDescription,
    created_at: CreatedAt<RentalRequest>,
}

impl RentalRequest {
    pub fn new(
        id: RequestId,
        requester_id: UserId,
        description: RequestDescription,
        created_at: CreatedAt<RentalRequest>,
    ) -> Self {
        Self {
            id,
            requester_id,
            description,
            created_at,
        }
    }
}
