//! HTTP routes
//!
//! - `POST /<route>` and `POST /` take a submission as JSON or form-encoded body
//! - `OPTIONS` on those paths answers the CORS preflight
//! - any other method on those paths is answered with 405
//! - `GET /healthz` reports liveness
//!
//! Every response body is a JSON envelope, including rejections, and every
//! response carries `Access-Control-Allow-Origin: *`.

use crate::config::ServerSection;
use intake_core::{IntakeError, ResponseEnvelope};
use intake_dispatch::{IntakeDispatcher, IntakeRequest, RawSubmission};
use serde_json::{json, Value};
use std::convert::Infallible;
use tracing::error;
use warp::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use warp::http::{HeaderMap, HeaderValue, Method, StatusCode};
use warp::{Filter, Rejection, Reply};

type EnvelopeReply = warp::reply::WithStatus<warp::reply::Json>;

/// All routes, with rejections rendered as envelopes
pub fn routes(
    dispatcher: IntakeDispatcher,
    server: &ServerSection,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    intake(dispatcher, &server.route, server.max_body_bytes)
        .or(health())
        .with(warp::trace::request())
        .recover(handle_rejection)
        .with(warp::reply::with::headers(cors_headers()))
}

/// The submission endpoint and its preflight
pub fn intake(
    dispatcher: IntakeDispatcher,
    route: &str,
    max_body_bytes: u64,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let post = intake_path(route)
        .and(warp::post())
        .and(submission(max_body_bytes))
        .and(with_dispatcher(dispatcher.clone()))
        .and_then(|payload: RawSubmission, dispatcher: IntakeDispatcher| async move {
            Ok::<_, Infallible>(run(IntakeRequest::post(payload), dispatcher).await)
        });

    let other = intake_path(route)
        .and(warp::method())
        .and(with_dispatcher(dispatcher))
        .and_then(other_method);

    let preflight = intake_path(route)
        .and(warp::options())
        .map(|| StatusCode::NO_CONTENT);

    preflight.or(post.or(other).unify())
}

pub fn health() -> impl Filter<Extract = (warp::reply::Json,), Error = Rejection> + Clone {
    warp::path("healthz")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&json!({ "status": "ok" })))
}

/// Sent on every response, whatever the request origin
pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    headers
}

fn intake_path(route: &str) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path(route.to_string())
        .and(warp::path::end())
        .or(warp::path::end())
        .unify()
}

fn with_dispatcher(
    dispatcher: IntakeDispatcher,
) -> impl Filter<Extract = (IntakeDispatcher,), Error = Infallible> + Clone {
    warp::any().map(move || dispatcher.clone())
}

fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Passes only when the declared content type is (or is not) JSON
fn json_body_declared(
    expected: bool,
) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::header::optional::<String>("content-type")
        .and_then(move |content_type: Option<String>| async move {
            if content_type.as_deref().is_some_and(is_json) == expected {
                Ok(())
            } else {
                Err(warp::reject::not_found())
            }
        })
        .untuple_one()
}

/// Decoded body. Exactly one branch reads the body, chosen by content type.
fn submission(
    max_body_bytes: u64,
) -> impl Filter<Extract = (RawSubmission,), Error = Rejection> + Clone {
    let json = json_body_declared(true)
        .and(warp::body::json())
        .map(|body: Value| match body {
            Value::Object(object) => RawSubmission::from_json(&object),
            _ => RawSubmission::new(),
        });
    let form = json_body_declared(false)
        .and(warp::body::form())
        .map(|pairs: Vec<(String, String)>| RawSubmission::from_pairs(pairs));

    warp::body::content_length_limit(max_body_bytes).and(json.or(form).unify())
}

async fn other_method(
    method: Method,
    dispatcher: IntakeDispatcher,
) -> Result<EnvelopeReply, Rejection> {
    // POST that reached here had an unreadable body; keep that rejection
    if method == Method::POST {
        return Err(warp::reject::not_found());
    }
    Ok(run(IntakeRequest::new(method.as_str(), RawSubmission::new()), dispatcher).await)
}

async fn run(request: IntakeRequest, dispatcher: IntakeDispatcher) -> EnvelopeReply {
    match tokio::task::spawn_blocking(move || dispatcher.dispatch(request)).await {
        Ok(Ok(receipt)) => envelope_reply(&receipt.to_envelope(), StatusCode::OK),
        Ok(Err(err)) => error_reply(&err),
        Err(err) => {
            error!(error = %err, "dispatch task failed");
            error_reply(&IntakeError::PersistenceFailed)
        }
    }
}

fn envelope_reply(envelope: &ResponseEnvelope, status: StatusCode) -> EnvelopeReply {
    warp::reply::with_status(warp::reply::json(envelope), status)
}

fn error_reply(err: &IntakeError) -> EnvelopeReply {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    envelope_reply(&ResponseEnvelope::from(err), status)
}

/// Render any rejection as a failure envelope
pub async fn handle_rejection(rejection: Rejection) -> Result<EnvelopeReply, Infallible> {
    let (status, label, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found", "No such endpoint.")
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "Payload too large",
            "The submission is too large.",
        )
    } else if rejection.find::<warp::reject::LengthRequired>().is_some() {
        (
            StatusCode::LENGTH_REQUIRED,
            "Length required",
            "The request must declare its length.",
        )
    } else if rejection.find::<warp::body::BodyDeserializeError>().is_some() {
        (
            StatusCode::BAD_REQUEST,
            "Invalid request body",
            "The submission could not be read.",
        )
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed",
            "Only POST requests are accepted.",
        )
    } else {
        error!(?rejection, "unhandled rejection");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error",
            "An error occurred while processing your request",
        )
    };
    Ok(envelope_reply(
        &ResponseEnvelope::failure(label, message),
        status,
    ))
}
