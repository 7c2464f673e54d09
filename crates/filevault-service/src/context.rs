//! Request context carrying the caller's tenant, identity and cancellation signal.

use std::future::Future;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::types::{TenantId, UserId};

/// Context for the current request.
///
/// Built once at the request boundary and passed into every service
/// method, so each operation knows *which tenant* it acts for and *who*
/// is acting. Tenant and caller are never read from ambient state.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The caller's tenant. Every record touched must belong to it.
    pub tenant_id: TenantId,
    /// The acting user, recorded as creator or uploader.
    pub user_id: UserId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
    /// Cooperative cancellation signal for in-flight I/O.
    cancel: CancellationToken,
}

impl RequestContext {
    /// Creates a context that is never cancelled.
    pub fn new(tenant_id: TenantId, user_id: UserId) -> Self {
        Self::with_cancel(tenant_id, user_id, CancellationToken::new())
    }

    /// Creates a context bound to an existing cancellation token.
    pub fn with_cancel(tenant_id: TenantId, user_id: UserId, cancel: CancellationToken) -> Self {
        Self {
            tenant_id,
            user_id,
            request_time: Utc::now(),
            cancel,
        }
    }

    /// The token observed by [`RequestContext::guard`].
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns whether the request has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run one suspension point, racing it against cancellation.
    ///
    /// Side effects the future already committed are kept; the caller just
    /// stops observing it and receives a `Cancelled` error.
    pub async fn guard<T, F>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(AppError::cancelled("Request cancelled"));
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AppError::cancelled("Request cancelled")),
            result = fut => result,
        }
    }
}
