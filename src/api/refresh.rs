//! Single-flight coordination for refresh-token exchanges.
//!
//! The first caller that needs a refresh creates the exchange future and
//! publishes it in the slot while still holding the lock; every caller that
//! arrives before it settles clones the same `Shared` handle. The slot is
//! emptied as soon as the exchange settles so the next expiry starts a new
//! cycle.

use super::errors::ApiError;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use secrecy::SecretString;
use tracing::debug;

pub(crate) type ExchangeResult = Result<SecretString, ApiError>;
type Exchange = Shared<BoxFuture<'static, ExchangeResult>>;

#[derive(Default)]
pub(crate) struct RefreshSlot {
    inflight: Mutex<Option<Exchange>>,
}

impl RefreshSlot {
    /// Join the outstanding exchange, or start one with `start`.
    pub(crate) async fn run<F>(&self, start: F) -> ExchangeResult
    where
        F: FnOnce() -> BoxFuture<'static, ExchangeResult>,
    {
        let exchange = {
            let mut slot = self.inflight.lock();
            if let Some(existing) = slot.as_ref() {
                debug!("joining in-flight token refresh");
                existing.clone()
            } else {
                debug!("starting token refresh");
                let fresh = start().shared();
                *slot = Some(fresh.clone());
                fresh
            }
        };

        let result = exchange.clone().await;

        // A later cycle may already own the slot; only clear our own exchange.
        let mut slot = self.inflight.lock();
        if slot
            .as_ref()
            .is_some_and(|current| current.ptr_eq(&exchange))
        {
            *slot = None;
        }

        result
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.inflight.lock().is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::Duration,
    };

    fn counting_exchange(
        calls: &Arc<AtomicUsize>,
        token: &'static str,
    ) -> BoxFuture<'static, ExchangeResult> {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(SecretString::from(token))
        }
        .boxed()
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_exchange() {
        let slot = RefreshSlot::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b, c) = tokio::join!(
            slot.run(|| counting_exchange(&calls, "fresh")),
            slot.run(|| counting_exchange(&calls, "other")),
            slot.run(|| counting_exchange(&calls, "other")),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for result in [a, b, c] {
            assert_eq!(result.unwrap().expose_secret(), "fresh");
        }
        assert!(slot.is_idle());
    }

    #[tokio::test]
    async fn settled_exchange_is_not_reused() {
        let slot = RefreshSlot::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = slot.run(|| counting_exchange(&calls, "one")).await.unwrap();
        let second = slot.run(|| counting_exchange(&calls, "two")).await.unwrap();

        assert_eq!(first.expose_secret(), "one");
        assert_eq!(second.expose_secret(), "two");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_shared_and_clear_the_slot() {
        let slot = RefreshSlot::default();
        let failing = || -> BoxFuture<'static, ExchangeResult> {
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Err(ApiError::http(401, r#"{"detail": "Token is invalid or expired"}"#))
            }
            .boxed()
        };

        let (a, b) = tokio::join!(slot.run(failing), slot.run(failing));
        assert_eq!(a.unwrap_err().status(), Some(401));
        assert_eq!(b.unwrap_err().status(), Some(401));
        assert!(slot.is_idle());
    }
}
