use crate::controller::Exhaust;
use application::transfer::{BookingSummaryDto, CommentDto, ItemDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct BookingSummaryResponse {
    id: Uuid,
    booker_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
}

impl From<BookingSummaryDto> for BookingSummaryResponse {
    fn from(dto: BookingSummaryDto) -> Self {
        Self {
            id: dto.id,
            booker_id: dto.booker_id,
            start: dto.start,
            end: dto.end,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    id: Uuid,
    text: String,
    author_name: String,
    #[serde(with = "time::serde::rfc3339")]
    created: OffsetDateTime,
}

impl From<CommentDto> for CommentResponse {
    fn from(dto: CommentDto) -> Self {
        Self {
            id: dto.id,
            text: dto.text,
            author_name: dto.author_name,
            created: dto.created,
        }
    }
}

impl IntoResponse for CommentResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    id: Uuid,
    name: String,
    description: String,
    available: bool,
    request_id: Option<Uuid>,
    current_booking: Option<BookingSummaryResponse>,
    next_booking: Option<BookingSummaryResponse>,
    comments: Vec<CommentResponse>,
}

impl From<ItemDto> for ItemResponse {
    fn from(dto: ItemDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            available: dto.available,
            request_id: dto.request_id,
            current_booking: dto.current_booking.map(BookingSummaryResponse::from),
            next_booking: dto.next_booking.map(BookingSummaryResponse::from),
            comments: dto.comments.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

impl IntoResponse for ItemResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<ItemDto> for Presenter {
    type To = ItemResponse;
    fn emit(&self, input: ItemDto) -> Self::To {
        ItemResponse::from(input)
    }
}

impl Exhaust<Vec<ItemDto>> for Presenter {
    type To = axum::Json<Vec<ItemResponse>>;
    fn emit(&self, input: Vec<ItemDto>) -> Self::To {
        axum::Json::from(input.into_iter().map(ItemResponse::from).collect::<Vec<_>>())
    }
}

pub struct CommentPresenter;

impl Exhaust<CommentDto> for CommentPresenter {
    type To = CommentResponse;
    fn emit(&self, input: CommentDto) -> Self::To {
        CommentResponse::from(input)
    }
}
