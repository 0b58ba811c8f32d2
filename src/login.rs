//! Login guard: failed-attempt counting, timed lockout, and an arithmetic
//! CAPTCHA in front of the authentication backend.
//!
//! The attempt counter and lockout expiry survive a full application reload
//! through the [`StateStore`] port. This guard is a UX deterrent, not a
//! security boundary: anyone who wipes the store resets it.

use parking_lot::Mutex;
use rand::Rng;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::gateway::DataGateway;
use crate::model::Session;

/// Persisted key holding the failed-attempt counter as a decimal string.
pub const ATTEMPTS_KEY: &str = "login_attempts";
/// Persisted key holding the lockout expiry as decimal epoch milliseconds.
pub const LOCKOUT_KEY: &str = "login_lockout";

/// Failed submissions allowed before the lockout engages.
pub const MAX_ATTEMPTS: u32 = 5;
/// Lockout duration once the threshold is hit.
pub const LOCKOUT_DURATION_MS: i64 = 30 * 60 * 1000;

/// Durable key-value port for the guard's persisted state. Writes are
/// best-effort; an implementation that cannot persist logs and carries on.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

/// File-backed store: one small JSON object, rewritten on every change.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(err) => {
                    warn!(path = %path.display(), %err, "state file unreadable, starting empty");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) {
        let serialized = match serde_json::to_string_pretty(entries) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(%err, "could not serialize state");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, serialized) {
            warn!(path = %self.path.display(), %err, "could not persist state");
        }
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

/// Time source for the guard, injectable so lockout timing is testable.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Two-operand addition challenge, regenerated once per page load rather
/// than per attempt.
#[derive(Debug, Clone, Copy)]
pub struct Captcha {
    num1: u8,
    num2: u8,
}

impl Captcha {
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            num1: rng.gen_range(1..=10),
            num2: rng.gen_range(1..=10),
        }
    }

    pub fn prompt(&self) -> String {
        format!("{} + {} = ?", self.num1, self.num2)
    }

    /// The operands, for rendering the challenge.
    pub fn operands(&self) -> (u8, u8) {
        (self.num1, self.num2)
    }

    pub fn verify(&self, answer: i64) -> bool {
        answer == i64::from(self.num1) + i64::from(self.num2)
    }
}

/// Current guard state as surfaced to the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Unlocked { attempts: u32 },
    Locked { remaining_secs: u64 },
}

/// Outcome of one submission.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Success(Session),
    /// Rejected without contacting the backend: still locked.
    Locked { remaining_secs: u64 },
    /// Rejected without contacting the backend and without consuming an
    /// attempt: wrong or missing CAPTCHA answer.
    WrongCaptcha,
    /// Credentials rejected; counter incremented but below the threshold.
    Rejected { attempts: u32, message: String },
    /// This failure hit the threshold; the lockout just engaged.
    LockedOut { lockout_secs: u64 },
}

pub struct LoginGuard {
    gateway: Arc<dyn DataGateway>,
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    captcha: Captcha,
    attempts: u32,
    locked_until_ms: Option<i64>,
}

impl LoginGuard {
    /// Build the guard, replaying persisted state: a live lockout expiry
    /// enters `Locked`, an expired one is cleared together with the attempt
    /// counter.
    pub fn new(
        gateway: Arc<dyn DataGateway>,
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let now = clock.now_ms();
        let mut locked_until_ms = None;
        if let Some(raw) = store.get(LOCKOUT_KEY) {
            match raw.parse::<i64>() {
                Ok(expiry) if expiry > now => {
                    debug!(expiry, "resuming persisted lockout");
                    locked_until_ms = Some(expiry);
                }
                Ok(_) => {
                    store.remove(LOCKOUT_KEY);
                    store.remove(ATTEMPTS_KEY);
                }
                Err(err) => {
                    warn!(%err, "discarding unparseable lockout value");
                    store.remove(LOCKOUT_KEY);
                }
            }
        }
        let attempts = store
            .get(ATTEMPTS_KEY)
            .and_then(|raw| raw.parse::<u32>().ok())
            .unwrap_or(0);

        Self {
            gateway,
            store,
            clock,
            captcha: Captcha::generate(),
            attempts,
            locked_until_ms,
        }
    }

    pub fn captcha(&self) -> &Captcha {
        &self.captcha
    }

    /// Fresh challenge for a new page load.
    pub fn regenerate_captcha(&mut self) {
        self.captcha = Captcha::generate();
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn state(&self) -> LoginState {
        match self.remaining_secs() {
            0 => LoginState::Unlocked {
                attempts: self.attempts,
            },
            remaining_secs => LoginState::Locked { remaining_secs },
        }
    }

    /// Seconds until the lockout expires, zero when not locked. Rounded up
    /// so a freshly engaged lockout reads as the full duration.
    pub fn remaining_secs(&self) -> u64 {
        let Some(until) = self.locked_until_ms else {
            return 0;
        };
        let left = until - self.clock.now_ms();
        if left <= 0 { 0 } else { ((left + 999) / 1000) as u64 }
    }

    /// One-second countdown step. Clears persisted lockout state and the
    /// attempt counter the moment the expiry passes.
    pub fn tick(&mut self) -> LoginState {
        if self.locked_until_ms.is_some() && self.remaining_secs() == 0 {
            self.clear_lockout();
        }
        self.state()
    }

    /// Submit credentials. The lockout is checked before the CAPTCHA so a
    /// locked-out user is always told "locked" and the lock cannot be
    /// bypassed; a wrong CAPTCHA never consumes an attempt and never reaches
    /// the backend.
    pub async fn submit(
        &mut self,
        email: &str,
        password: &str,
        captcha_answer: Option<i64>,
    ) -> SubmitOutcome {
        match self.tick() {
            LoginState::Locked { remaining_secs } => {
                return SubmitOutcome::Locked { remaining_secs };
            }
            LoginState::Unlocked { .. } => {}
        }

        let captcha_ok = captcha_answer.map(|a| self.captcha.verify(a)).unwrap_or(false);
        if !captcha_ok {
            debug!("captcha mismatch, backend not contacted");
            return SubmitOutcome::WrongCaptcha;
        }

        match self.gateway.sign_in(email, password).await {
            Ok(session) => {
                self.attempts = 0;
                self.locked_until_ms = None;
                self.store.remove(ATTEMPTS_KEY);
                self.store.remove(LOCKOUT_KEY);
                info!(user = %session.email, "login succeeded");
                SubmitOutcome::Success(session)
            }
            Err(err) => {
                self.attempts += 1;
                self.store.set(ATTEMPTS_KEY, &self.attempts.to_string());
                if self.attempts >= MAX_ATTEMPTS {
                    let until = self.clock.now_ms() + LOCKOUT_DURATION_MS;
                    self.locked_until_ms = Some(until);
                    self.store.set(LOCKOUT_KEY, &until.to_string());
                    warn!(attempts = self.attempts, "lockout engaged");
                    SubmitOutcome::LockedOut {
                        lockout_secs: (LOCKOUT_DURATION_MS / 1000) as u64,
                    }
                } else {
                    debug!(attempts = self.attempts, "login attempt failed");
                    SubmitOutcome::Rejected {
                        attempts: self.attempts,
                        message: err.to_string(),
                    }
                }
            }
        }
    }

    fn clear_lockout(&mut self) {
        self.locked_until_ms = None;
        self.attempts = 0;
        self.store.remove(LOCKOUT_KEY);
        self.store.remove(ATTEMPTS_KEY);
        debug!("lockout expired, state cleared");
    }
}
