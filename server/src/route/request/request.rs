use crate::controller::Intake;
use crate::extract::CallerId;
use application::transfer::{CreateRequestDto, GetRequestDto, ListRequestsDto};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateRequestRequest {
    description: String,
}

pub struct Transformer;

impl Intake<(CallerId, CreateRequestRequest)> for Transformer {
    type To = CreateRequestDto;
    fn emit(&self, (caller, req): (CallerId, CreateRequestRequest)) -> Self::To {
        CreateRequestDto {
            requester_id: caller.0,
            description: req.description,
        }
    }
}

impl Intake<CallerId> for Transformer {
    type To = ListRequestsDto;
    fn emit(&self, caller: CallerId) -> Self::To {
        ListRequestsDto {
            caller_id: caller.0,
        }
    }
}

impl Intake<(CallerId, Uuid)> for Transformer {
    type To = GetRequestDto;
    fn emit(&self, (caller, request_id): (CallerId, Uuid)) -> Self::To {
        GetRequestDto {
            request_id,
            caller_id: caller.0,
        }
    }
}

impl Intake<()> for Transformer {
    type To = ();
    fn emit(&self, input: ()) -> Self::To {
        input
    }
}
