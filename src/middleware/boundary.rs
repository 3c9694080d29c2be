use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures::FutureExt;

use crate::error::{ApiError, UserError};

/// Last-resort translator: a panicking handler becomes the generic 500 envelope.
pub async fn catch_unclassified(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(resp) => resp,
        Err(payload) => {
            ApiError::new(UserError::Unclassified(panic_message(&*payload)), path).into_response()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// Unknown routes get the same envelope as every other failure.
pub async fn not_found(req: Request) -> Response {
    let err = UserError::RouteNotFound {
        method: req.method().to_string(),
    };
    ApiError::new(err, req.uri().path()).into_response()
}
