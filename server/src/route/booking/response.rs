use crate::controller::Exhaust;
use application::transfer::{BookingDto, ItemShortDto, UserDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::prelude::entity::BookingStatus;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct BookedItemResponse {
    id: Uuid,
    name: String,
    owner_id: Uuid,
}

impl From<ItemShortDto> for BookedItemResponse {
    fn from(dto: ItemShortDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            owner_id: dto.owner_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookerResponse {
    id: Uuid,
    name: String,
}

impl From<UserDto> for BookerResponse {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    id: Uuid,
    item: BookedItemResponse,
    booker: BookerResponse,
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
    status: BookingStatus,
}

impl From<BookingDto> for BookingResponse {
    fn from(dto: BookingDto) -> Self {
        Self {
            id: dto.id,
            item: BookedItemResponse::from(dto.item),
            booker: BookerResponse::from(dto.booker),
            start: dto.start,
            end: dto.end,
            status: dto.status,
        }
    }
}

impl IntoResponse for BookingResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<BookingDto> for Presenter {
    type To = BookingResponse;
    fn emit(&self, input: BookingDto) -> Self::To {
        BookingResponse::from(input)
    }
}

impl Exhaust<Vec<BookingDto>> for Presenter {
    type To = axum::Json<Vec<BookingResponse>>;
    fn emit(&self, input: Vec<BookingDto>) -> Self::To {
        axum::Json::from(
            input
                .into_iter()
                .map(BookingResponse::from)
                .collect::<Vec<_>>(),
        )
    }
}
