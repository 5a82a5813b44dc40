mod request;
mod response;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::CallerId;
use crate::handler::AppModule;
use crate::route::booking::request::{
    ApproveQuery, CreateBookingRequest, ListBookingsQuery, Transformer,
};
use crate::route::booking::response::Presenter;
use application::service::{
    CreateBookingService, GetBookingService, ListBookingsService, UpdateBookingStatusService,
};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

pub trait BookingRouter {
    fn route_booking(self) -> Self;
}

impl BookingRouter for Router<AppModule> {
    fn route_booking(self) -> Self {
        self.route(
            "/bookings",
            get(
                |State(handler): State<AppModule>,
                 caller: CallerId,
                 Query(query): Query<ListBookingsQuery>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((caller, query))
                        .handle(|dto| handler.pgpool().find_all_by_booker(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(handler): State<AppModule>,
                 caller: CallerId,
                 Json(req): Json<CreateBookingRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((caller, req))
                        .handle(|dto| handler.pgpool().create_booking(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/bookings/owner",
            get(
                |State(handler): State<AppModule>,
                 caller: CallerId,
                 Query(query): Query<ListBookingsQuery>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((caller, query))
                        .handle(|dto| handler.pgpool().find_all_by_owner(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/bookings/:id",
            get(
                |State(handler): State<AppModule>,
                 caller: CallerId,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((caller, id))
                        .handle(|dto| handler.pgpool().get_booking(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .patch(
                |State(handler): State<AppModule>,
                 caller: CallerId,
                 Path(id): Path<Uuid>,
                 Query(query): Query<ApproveQuery>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((caller, id, query))
                        .handle(|dto| handler.pgpool().update_booking_status(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
