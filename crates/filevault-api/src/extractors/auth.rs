//! `Caller` extractor: resolves tenant and user from gateway headers.
//!
//! Authentication happens upstream; the gateway forwards the resolved
//! identity as `x-tenant-id` and `x-user-id`.

use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tokio_util::sync::{CancellationToken, DropGuard};

use filevault_core::error::AppError;
use filevault_core::types::{TenantId, UserId};
use filevault_service::context::RequestContext;

use crate::error::ApiError;

/// Header carrying the caller's tenant id.
pub const TENANT_HEADER: &str = "x-tenant-id";
/// Header carrying the caller's user id.
pub const USER_HEADER: &str = "x-user-id";

/// The caller of the current request.
///
/// Owns the request's cancellation token through a drop guard: when the
/// handler future is dropped (client disconnect or timeout), in-flight
/// engine I/O observes the cancellation.
#[derive(Debug)]
pub struct Caller {
    ctx: RequestContext,
    _cancel_on_drop: DropGuard,
}

impl Caller {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }
}

impl std::ops::Deref for Caller {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

fn header_id<T: FromStr>(parts: &Parts, name: &str) -> Result<T, AppError> {
    let raw = parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::validation(format!("Missing {name} header")))?;
    raw.trim()
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid {name} header")))
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant_id: TenantId = header_id(parts, TENANT_HEADER)?;
        let user_id: UserId = header_id(parts, USER_HEADER)?;

        let token = CancellationToken::new();
        let ctx = RequestContext::with_cancel(tenant_id, user_id, token.clone());

        Ok(Caller {
            ctx,
            _cancel_on_drop: token.drop_guard(),
        })
    }
}
