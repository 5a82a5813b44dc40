use crate::controller::Intake;
use crate::extract::CallerId;
use application::transfer::{
    CreateCommentDto, CreateItemDto, GetItemDto, ListOwnedItemsDto, SearchItemsDto, UpdateItemDto,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    name: String,
    description: String,
    available: bool,
    request_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    name: Option<String>,
    description: Option<String>,
    available: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    text: String,
}

pub struct Transformer;

impl Intake<CallerId> for Transformer {
    type To = ListOwnedItemsDto;
    fn emit(&self, caller: CallerId) -> Self::To {
        ListOwnedItemsDto {
            owner_id: caller.0,
        }
    }
}

impl Intake<(CallerId, CreateItemRequest)> for Transformer {
    type To = CreateItemDto;
    fn emit(&self, (caller, req): (CallerId, CreateItemRequest)) -> Self::To {
        CreateItemDto {
            owner_id: caller.0,
            name: req.name,
            description: req.description,
            available: req.available,
            request_id: req.request_id,
        }
    }
}

impl Intake<(CallerId, Uuid, UpdateItemRequest)> for Transformer {
    type To = UpdateItemDto;
    fn emit(&self, (caller, item_id, req): (CallerId, Uuid, UpdateItemRequest)) -> Self::To {
        UpdateItemDto {
            item_id,
            caller_id: caller.0,
            name: req.name,
            description: req.description,
            available: req.available,
        }
    }
}

impl Intake<GetItemDto> for Transformer {
    type To = GetItemDto;
    fn emit(&self, input: GetItemDto) -> Self::To {
        input
    }
}

impl Intake<SearchQuery> for Transformer {
    type To = SearchItemsDto;
    fn emit(&self, query: SearchQuery) -> Self::To {
        SearchItemsDto { text: query.text }
    }
}

impl Intake<(CallerId, Uuid, CreateCommentRequest)> for Transformer {
    type To = CreateCommentDto;
    fn emit(&self, (caller, item_id, req): (CallerId, Uuid, CreateCommentRequest)) -> Self::To {
        CreateCommentDto {
            item_id,
            author_id: caller.0,
            text: req.text,
        }
    }
}
