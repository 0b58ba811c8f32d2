//! Shared fakes for integration tests: a scripted in-memory gateway and a
//! manually advanced clock.

use async_trait::async_trait;
use kelasku::{DataGateway, GatewayError, SelectRequest, Session};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::time::Duration;

/// Gateway double. Collections without scripted rows report a transport
/// failure, which is exactly the condition the fallback policy absorbs.
#[derive(Default)]
pub struct FakeGateway {
    rows: Mutex<HashMap<String, Result<Vec<Value>, GatewayError>>>,
    select_calls: Mutex<HashMap<String, u32>>,
    select_delay: Mutex<Option<Duration>>,
    write_error: Mutex<Option<GatewayError>>,
    write_calls: AtomicU32,
    inserts: Mutex<Vec<(String, Value)>>,
    accept_sign_in: Mutex<bool>,
    sign_in_calls: AtomicU32,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rows(&self, collection: &str, rows: Vec<Value>) {
        self.rows.lock().insert(collection.to_string(), Ok(rows));
    }

    pub fn set_error(&self, collection: &str, err: GatewayError) {
        self.rows.lock().insert(collection.to_string(), Err(err));
    }

    /// Delay every select, so concurrent requesters overlap deterministically.
    pub fn set_select_delay(&self, delay: Duration) {
        *self.select_delay.lock() = Some(delay);
    }

    pub fn select_count(&self, collection: &str) -> u32 {
        self.select_calls.lock().get(collection).copied().unwrap_or(0)
    }

    pub fn fail_writes(&self, err: GatewayError) {
        *self.write_error.lock() = Some(err);
    }

    pub fn write_count(&self) -> u32 {
        self.write_calls.load(Ordering::Relaxed)
    }

    pub fn last_insert(&self) -> Option<(String, Value)> {
        self.inserts.lock().last().cloned()
    }

    pub fn accept_sign_in(&self, accept: bool) {
        *self.accept_sign_in.lock() = accept;
    }

    pub fn sign_in_count(&self) -> u32 {
        self.sign_in_calls.load(Ordering::Relaxed)
    }

    fn record_write(&self) -> Result<(), GatewayError> {
        self.write_calls.fetch_add(1, Ordering::Relaxed);
        match self.write_error.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataGateway for FakeGateway {
    async fn select(&self, request: SelectRequest) -> Result<Vec<Value>, GatewayError> {
        *self
            .select_calls
            .lock()
            .entry(request.collection.to_string())
            .or_insert(0) += 1;
        let delay = *self.select_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.rows
            .lock()
            .get(request.collection)
            .cloned()
            .unwrap_or_else(|| {
                Err(GatewayError::Transport {
                    collection: request.collection.to_string(),
                    message: "unscripted collection".to_string(),
                })
            })
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<(), GatewayError> {
        self.inserts.lock().push((collection.to_string(), record));
        self.record_write()
    }

    async fn update(&self, _collection: &str, _id: &str, _patch: Value) -> Result<(), GatewayError> {
        self.record_write()
    }

    async fn delete(&self, _collection: &str, _id: &str) -> Result<(), GatewayError> {
        self.record_write()
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<Session, GatewayError> {
        self.sign_in_calls.fetch_add(1, Ordering::Relaxed);
        if *self.accept_sign_in.lock() {
            Ok(Session {
                access_token: "token".to_string(),
                user_id: "user-1".to_string(),
                email: email.to_string(),
                role: Some("admin".to_string()),
            })
        } else {
            Err(GatewayError::AuthRejected {
                message: "invalid login credentials".to_string(),
            })
        }
    }
}

/// Clock under test control; starts at an arbitrary fixed epoch.
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn at(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        self.now_ms.fetch_add(secs * 1000, Ordering::Relaxed);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.now_ms.fetch_add(ms, Ordering::Relaxed);
    }
}

impl kelasku::Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::Relaxed)
    }
}
