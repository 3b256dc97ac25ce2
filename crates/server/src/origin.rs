// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request origin extraction.
//!
//! Identity is established upstream of this server. The gateway forwards the
//! caller in `x-actor-id` / `x-actor-type` and a correlation id in
//! `x-request-id`; both end up on the audit event of any write.

use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use roms_api::RequestContext;
use roms_audit::{Actor, Cause};
use time::OffsetDateTime;
use tracing::debug;

use crate::error::HttpError;

/// Header naming the acting user.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Header naming the kind of actor.
pub const ACTOR_TYPE_HEADER: &str = "x-actor-type";
/// Header carrying the caller's correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Extractor producing the [`RequestContext`] for a request.
///
/// Requests without an actor header are attributed to `system`; requests
/// without a request id get one generated.
///
/// # Errors
///
/// Rejects with 400 if any origin header is not valid UTF-8 or is blank.
pub struct RequestOrigin(pub RequestContext);

impl<S: Send + Sync> FromRequestParts<S> for RequestOrigin {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let actor: Actor = match header(&parts.headers, ACTOR_ID_HEADER)? {
            Some(actor_id) => Actor::new(
                actor_id,
                header(&parts.headers, ACTOR_TYPE_HEADER)?
                    .unwrap_or_else(|| String::from("operator")),
            ),
            None => Actor::new(String::from("system"), String::from("system")),
        };
        let request_id: String = header(&parts.headers, REQUEST_ID_HEADER)?
            .unwrap_or_else(|| generate_request_id(now));
        let cause: Cause = Cause::new(request_id, format!("{} {}", parts.method, parts.uri.path()));

        debug!(actor_id = %actor.id, cause_id = %cause.id, "Resolved request origin");
        Ok(Self(RequestContext::new(actor, cause, now)))
    }
}

fn header(headers: &HeaderMap, name: &str) -> Result<Option<String>, HttpError> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    let value: &str = value
        .to_str()
        .map_err(|_| HttpError::bad_request(format!("header {name} is not valid UTF-8")))?
        .trim();
    if value.is_empty() {
        return Err(HttpError::bad_request(format!("header {name} is blank")));
    }
    Ok(Some(value.to_string()))
}

fn generate_request_id(now: OffsetDateTime) -> String {
    let sequence: u64 = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{sequence}", now.unix_timestamp())
}
