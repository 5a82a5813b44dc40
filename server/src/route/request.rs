mod request;
mod response;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::CallerId;
use crate::handler::AppModule;
use crate::route::request::request::{CreateRequestRequest, Transformer};
use crate::route::request::response::Presenter;
use application::service::{CreateRequestService, GetRequestService};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

pub trait RequestRouter {
    fn route_request(self) -> Self;
}

impl RequestRouter for Router<AppModule> {
    fn route_request(self) -> Self {
        self.route(
            "/requests",
            get(
                |State(handler): State<AppModule>, caller: CallerId| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(caller)
                        .handle(|dto| handler.pgpool().find_all_by_requester(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(handler): State<AppModule>,
                 caller: CallerId,
                 Json(req): Json<CreateRequestRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((caller, req))
                        .handle(|dto| handler.pgpool().create_request(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/requests/all",
            get(|State(handler): State<AppModule>| async move {
                Controller::new(Transformer, Presenter)
                    .intake(())
                    .handle(|()| handler.pgpool().find_all_requests())
                    .await
                    .map_err(ErrorStatus::from)
            }),
        )
        .route(
            "/requests/:id",
            get(
                |State(handler): State<AppModule>,
                 caller: CallerId,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((caller, id))
                        .handle(|dto| handler.pgpool().get_request(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
