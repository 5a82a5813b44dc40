use crate::controller::Intake;
use crate::extract::CallerId;
use application::transfer::{
    CreateBookingDto, GetBookingDto, ListBookingsDto, UpdateBookingStatusDto,
};
use kernel::prelude::entity::BookingState;
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    item_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct ApproveQuery {
    approved: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    #[serde(default)]
    state: BookingState,
}

pub struct Transformer;

impl Intake<(CallerId, CreateBookingRequest)> for Transformer {
    type To = CreateBookingDto;
    fn emit(&self, (caller, req): (CallerId, CreateBookingRequest)) -> Self::To {
        CreateBookingDto {
            booker_id: caller.0,
            item_id: req.item_id,
            start: req.start,
            end: req.end,
        }
    }
}

impl Intake<(CallerId, Uuid, ApproveQuery)> for Transformer {
    type To = UpdateBookingStatusDto;
    fn emit(&self, (caller, booking_id, query): (CallerId, Uuid, ApproveQuery)) -> Self::To {
        UpdateBookingStatusDto {
            booking_id,
            caller_id: caller.0,
            approved: query.approved,
        }
    }
}

impl Intake<(CallerId, Uuid)> for Transformer {
    type To = GetBookingDto;
    fn emit(&self, (caller, booking_id): (CallerId, Uuid)) -> Self::To {
        GetBookingDto {
            booking_id,
            caller_id: caller.0,
        }
    }
}

impl Intake<(CallerId, ListBookingsQuery)> for Transformer {
    type To = ListBookingsDto;
    fn emit(&self, (caller, query): (CallerId, ListBookingsQuery)) -> Self::To {
        ListBookingsDto {
            user_id: caller.0,
            state: query.state,
        }
    }
}
