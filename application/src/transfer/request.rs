use kernel::prelude::entity::{DestructRentalRequest, Item, RentalRequest};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transfer::ItemShortDto;

#[derive(Debug, Clone, PartialEq)]
pub struct RequestDto {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub description: String,
    pub created: OffsetDateTime,
    /// Items posted in answer to this request.
    pub items: Vec<ItemShortDto>,
}

impl RequestDto {
    pub fn project(request: RentalRequest, items: Vec<Item>) -> Self {
        let DestructRentalRequest {
            id,
            requester_id,
            description,
            created_at,
        } = request.into_destruct();
        Self {
            id: id.into(),
            requester_id: requester_id.into(),
            description: description.into(),
            created: created_at.into(),
            items: items.into_iter().map(ItemShortDto::from).collect(),
        }
    }
}

pub struct CreateRequestDto {
    pub requester_id: Uuid,
    pub description: String,
}

pub struct GetRequestDto {
    pub request_id: Uuid,
    pub caller_id: Uuid,
}

pub struct ListRequestsDto {
    pub caller_id: Uuid,
}
