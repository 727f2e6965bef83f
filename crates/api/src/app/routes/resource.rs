//! CRUD handlers shared by every resource kind.
//!
//! Paths are `/api/v2/<kind>` and `/api/v2/<kind>/:id`, where `<kind>` is
//! the entity's `KIND`.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tokio_stream::StreamExt;

use taproom_catalog::{Resource, ResourceService};
use taproom_core::EntityId;

use crate::app::errors;
use crate::app::services::{AppServices, ServesResource};

pub const API_PREFIX: &str = "/api/v2";

pub fn collection_path<R: Resource>() -> String {
    format!("{API_PREFIX}/{}", R::KIND)
}

pub fn router<R>() -> Router
where
    R: Resource,
    AppServices: ServesResource<R>,
{
    let collection = collection_path::<R>();
    let item = format!("{collection}/:id");

    Router::new()
        .route(&collection, get(list::<R>).post(create::<R>))
        .route(
            &item,
            get(get_by_id::<R>)
                .put(replace::<R>)
                .patch(patch::<R>)
                .delete(delete::<R>),
        )
}

pub async fn list<R>(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response
where
    R: Resource,
    AppServices: ServesResource<R>,
{
    let service = service_for::<R>(&services);
    match service.list().await {
        Ok(stream) => {
            let items: Vec<R::Dto> = stream.collect().await;
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_by_id<R>(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response
where
    R: Resource,
    AppServices: ServesResource<R>,
{
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let service = service_for::<R>(&services);
    match service.get_by_id(id).await {
        Ok(Some(dto)) => (StatusCode::OK, Json(dto)).into_response(),
        Ok(None) => errors::not_found(R::KIND, id),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create<R>(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<R::Dto>, JsonRejection>,
) -> axum::response::Response
where
    R: Resource,
    AppServices: ServesResource<R>,
{
    let body = match read_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let service = service_for::<R>(&services);
    let created = match service.create(body).await {
        Ok(dto) => dto,
        Err(e) => return errors::service_error_to_response(e),
    };

    let Some(id) = R::dto_id(&created) else {
        return errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            "store did not assign an id",
        );
    };

    let location = services.location(&format!("{}/{id}", collection_path::<R>()));
    (StatusCode::CREATED, [(header::LOCATION, location)]).into_response()
}

pub async fn replace<R>(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<R::Dto>, JsonRejection>,
) -> axum::response::Response
where
    R: Resource,
    AppServices: ServesResource<R>,
{
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let body = match read_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let service = service_for::<R>(&services);
    match service.replace(id, body).await {
        Ok(Some(_)) => StatusCode::NO_CONTENT.into_response(),
        Ok(None) => errors::not_found(R::KIND, id),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn patch<R>(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<R::Dto>, JsonRejection>,
) -> axum::response::Response
where
    R: Resource,
    AppServices: ServesResource<R>,
{
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let body = match read_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let service = service_for::<R>(&services);
    match service.patch(id, body).await {
        Ok(Some(dto)) => (StatusCode::OK, Json(dto)).into_response(),
        Ok(None) => errors::not_found(R::KIND, id),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Reports 404 for unknown ids; the store itself deletes silently.
pub async fn delete<R>(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response
where
    R: Resource,
    AppServices: ServesResource<R>,
{
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let service = service_for::<R>(&services);
    match service.get_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return errors::not_found(R::KIND, id),
        Err(e) => return errors::service_error_to_response(e),
    }

    match service.delete_by_id(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

fn service_for<R>(services: &AppServices) -> &ResourceService<R>
where
    R: Resource,
    AppServices: ServesResource<R>,
{
    <AppServices as ServesResource<R>>::service(services)
}

fn parse_id(raw: &str) -> Result<EntityId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("'{raw}' is not a valid id")))
}

fn read_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    match body {
        Ok(Json(v)) => Ok(v),
        Err(rejection) => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            rejection.body_text(),
        )),
    }
}
