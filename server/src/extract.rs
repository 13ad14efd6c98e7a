use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use error_stack::{Report, ResultExt};
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{Actor, ActorRole, AuditContext, ClientIp, UserId, UserName};
use kernel::KernelError;

use crate::error::ErrorStatus;

const USER_ID: &str = "x-user-id";
const USER_NAME: &str = "x-user-name";
const USER_ROLE: &str = "x-user-role";
const FORWARDED_FOR: &str = "x-forwarded-for";
const MANAGER: &str = "manager";

/// The user the gateway authenticated, taken from its identity headers.
pub struct CurrentActor(pub Actor);

/// Where the request came from, for the audit trail.
pub struct RequestOrigin(pub Option<ClientIp>);

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| String::from_utf8(value.as_bytes().to_vec()).ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn missing(name: &str) -> Report<KernelError> {
    Report::new(KernelError::Forbidden).attach_printable(format!("Missing {name} header"))
}

pub(crate) fn actor_from_headers(headers: &HeaderMap) -> error_stack::Result<Actor, KernelError> {
    let id = header(headers, USER_ID).ok_or_else(|| missing(USER_ID))?;
    let id = Uuid::parse_str(&id)
        .change_context_lazy(|| KernelError::Forbidden)
        .attach_printable_lazy(|| format!("{USER_ID} is not a uuid: {id}"))?;
    let name = header(headers, USER_NAME).ok_or_else(|| missing(USER_NAME))?;
    let role = match header(headers, USER_ROLE) {
        Some(role) if role.eq_ignore_ascii_case(MANAGER) => ActorRole::Manager,
        _ => ActorRole::Member,
    };
    Ok(Actor::new(UserId::new(id), UserName::new(name), role))
}

pub(crate) fn origin_from_parts(parts: &Parts) -> Option<ClientIp> {
    let forwarded = header(&parts.headers, FORWARDED_FOR).and_then(|value| {
        value
            .split(',')
            .next()
            .map(str::trim)
            .filter(|hop| !hop.is_empty())
            .map(str::to_string)
    });
    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());
    forwarded.or(peer).map(ClientIp::new)
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentActor {
    type Rejection = ErrorStatus;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        actor_from_headers(&parts.headers)
            .map(CurrentActor)
            .map_err(ErrorStatus::from)
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestOrigin(origin_from_parts(parts)))
    }
}

/// Stamps a lifecycle request with who, where from and now.
pub fn audit_context(actor: CurrentActor, origin: RequestOrigin) -> AuditContext {
    AuditContext::new(actor.0, origin.0, OffsetDateTime::now_utc())
}
