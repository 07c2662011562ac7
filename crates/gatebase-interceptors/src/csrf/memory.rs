use super::{CsrfFailure, CsrfStore};
use crate::errors::InterceptError;
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use gatebase_auth::sweep::SweeperHandle;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 256 bits of entropy per token.
const TOKEN_BYTES: usize = 32;

struct Entry {
    created_at: Instant,
    identity: String,
}

/// In-memory anti-forgery token store. Tokens are opaque random values bound
/// to the identity they were issued for, valid until the ttl elapses.
pub struct MemoryCsrfStore {
    entries: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
    single_use: bool,
}

impl MemoryCsrfStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            single_use: false,
        }
    }

    /// Invalidate tokens on first successful validation instead of letting
    /// them live until the ttl.
    pub fn with_single_use(mut self, single_use: bool) -> Self {
        self.single_use = single_use;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn tracked(&self) -> usize {
        self.entries.read().len()
    }

    pub fn issue_at(&self, identity: &str, now: Instant) -> Result<String, InterceptError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        getrandom::getrandom(&mut bytes)
            .map_err(|err| InterceptError::internal(&format!("token entropy unavailable: {err}")))?;
        let token = URL_SAFE_NO_PAD.encode(bytes);

        self.entries.write().insert(
            token.clone(),
            Entry {
                created_at: now,
                identity: identity.to_string(),
            },
        );
        Ok(token)
    }

    pub fn validate_at(
        &self,
        token: &str,
        identity: &str,
        now: Instant,
    ) -> Result<(), CsrfFailure> {
        {
            let entries = self.entries.read();
            let entry = entries.get(token).ok_or(CsrfFailure::Missing)?;
            if now.duration_since(entry.created_at) > self.ttl {
                return Err(CsrfFailure::Expired);
            }
            if entry.identity != identity {
                return Err(CsrfFailure::IdentityMismatch);
            }
        }

        if self.single_use {
            self.entries.write().remove(token);
        }
        Ok(())
    }

    /// Deletes entries past the ttl. Returns how many were evicted.
    pub fn sweep_once(&self, now: Instant) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.created_at) <= self.ttl);
        before - entries.len()
    }

    pub fn spawn_sweeper(self: &Arc<Self>) -> SweeperHandle {
        let store = Arc::clone(self);
        SweeperHandle::spawn(self.ttl, move || {
            let evicted = store.sweep_once(Instant::now());
            if evicted > 0 {
                tracing::debug!(target: "gatebase::csrf", evicted, "evicted expired tokens");
            }
        })
    }
}

#[async_trait]
impl CsrfStore for MemoryCsrfStore {
    async fn issue(&self, identity: &str) -> Result<String, InterceptError> {
        self.issue_at(identity, Instant::now())
    }

    async fn validate(&self, token: &str, identity: &str) -> Result<(), CsrfFailure> {
        self.validate_at(token, identity, Instant::now())
    }

    async fn invalidate(&self, token: &str) {
        self.entries.write().remove(token);
    }
}
