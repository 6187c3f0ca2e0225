use std::convert::Infallible;
use std::sync::Arc;

use log::{debug, error};
use warp::{
    http::{StatusCode, Uri},
    reply, Filter, Rejection, Reply,
};

use super::static_assets::serve_asset;
use super::types::{ApiError, EmailQuery, MessageResponse};
use crate::error_handling::types::RegistrationError;
use crate::storage::storage_trait::ActivityStore;

fn with_store(
    store: Arc<dyn ActivityStore>,
) -> impl Filter<Extract = (Arc<dyn ActivityStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn error_reply(detail: &str, status: StatusCode) -> reply::Response {
    reply::with_status(
        reply::json(&ApiError {
            detail: detail.to_string(),
        }),
        status,
    )
    .into_response()
}

fn registration_error_reply(err: &RegistrationError) -> reply::Response {
    match err {
        RegistrationError::Storage(e) => error!("Registration failed: {}", e),
        other => debug!("Registration rejected: {}", other),
    }
    error_reply(err.detail(), err.status_code())
}

/// Path segments arrive percent-encoded ("Chess%20Club").
fn decode_segment(raw: &str) -> Option<String> {
    urlencoding::decode(raw).ok().map(|s| s.into_owned())
}

/// Every endpoint, with rejections turned into JSON error bodies.
pub fn routes(
    store: Arc<dyn ActivityStore>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    root_route()
        .or(list_activities_route(store.clone()))
        .or(signup_route(store.clone()))
        .or(unregister_route(store))
        .or(static_route())
        .recover(handle_rejection)
}

/// GET /
pub fn root_route() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .map(|| warp::redirect::temporary(Uri::from_static("/static/index.html")))
}

/// GET /static/<path>
pub fn static_route() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("static")
        .and(warp::path::tail())
        .and(warp::get())
        .and_then(serve_asset)
}

/// GET /activities
pub fn list_activities_route(
    store: Arc<dyn ActivityStore>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("activities")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_store(store))
        .and_then(|store: Arc<dyn ActivityStore>| async move {
            match store.list_activities().await {
                Ok(catalog) => Ok::<_, Rejection>(reply::json(&catalog).into_response()),
                Err(e) => {
                    error!("Failed to list activities: {}", e);
                    Ok::<_, Rejection>(error_reply(
                        "Failed to load activities",
                        StatusCode::INTERNAL_SERVER_ERROR,
                    ))
                }
            }
        })
}

/// POST /activities/:name/signup?email=
pub fn signup_route(
    store: Arc<dyn ActivityStore>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("activities" / String / "signup")
        .and(warp::post())
        .and(warp::query::<EmailQuery>())
        .and(with_store(store))
        .and_then(
            |raw_name: String, query: EmailQuery, store: Arc<dyn ActivityStore>| async move {
                let Some(activity_name) = decode_segment(&raw_name) else {
                    return Ok::<_, Rejection>(registration_error_reply(
                        &RegistrationError::ActivityNotFound,
                    ));
                };
                let res = match store.signup(&activity_name, &query.email).await {
                    Ok(()) => reply::json(&MessageResponse {
                        message: format!("Signed up {} for {}", query.email, activity_name),
                    })
                    .into_response(),
                    Err(e) => registration_error_reply(&e),
                };
                Ok::<_, Rejection>(res)
            },
        )
}

/// DELETE /activities/:name/unregister?email=
pub fn unregister_route(
    store: Arc<dyn ActivityStore>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("activities" / String / "unregister")
        .and(warp::delete())
        .and(warp::query::<EmailQuery>())
        .and(with_store(store))
        .and_then(
            |raw_name: String, query: EmailQuery, store: Arc<dyn ActivityStore>| async move {
                let Some(activity_name) = decode_segment(&raw_name) else {
                    return Ok::<_, Rejection>(registration_error_reply(
                        &RegistrationError::ActivityNotFound,
                    ));
                };
                let res = match store.unregister(&activity_name, &query.email).await {
                    Ok(()) => reply::json(&MessageResponse {
                        message: format!("Unregistered {} from {}", query.email, activity_name),
                    })
                    .into_response(),
                    Err(e) => registration_error_reply(&e),
                };
                Ok::<_, Rejection>(res)
            },
        )
}

/// Maps unmatched requests to `{"detail": ...}` bodies.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, detail) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("{}: expected an `email` query parameter", e),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed".to_string())
    } else {
        error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        )
    };
    Ok(reply::with_status(reply::json(&ApiError { detail }), status))
}
