//! Passphrase capability requested by the session bootstrap.
//!
//! The record layer never talks to a terminal. Callers hand in a
//! [`PassphraseProvider`]; the CLI prompts, tests use [`StaticPassphrase`].

use std::sync::Mutex;

use zeroize::Zeroizing;

use crate::error::{RecordError, RecordResult};

/// Why a passphrase is being requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptReason {
    /// Unlock an existing database.
    Unlock,
    /// Pick the passphrase for a new database.
    Choose,
    /// Repeat the chosen passphrase.
    Confirm,
}

impl PromptReason {
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Unlock => "Enter database passphrase",
            Self::Choose => "Choose a database passphrase",
            Self::Confirm => "Confirm database passphrase",
        }
    }
}

pub trait PassphraseProvider: Send + Sync {
    fn passphrase(&self, reason: PromptReason) -> RecordResult<Zeroizing<String>>;
}

/// Always answers with the same passphrase.
pub struct StaticPassphrase(Zeroizing<String>);

impl StaticPassphrase {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self(Zeroizing::new(passphrase.into()))
    }
}

impl PassphraseProvider for StaticPassphrase {
    fn passphrase(&self, _reason: PromptReason) -> RecordResult<Zeroizing<String>> {
        Ok(self.0.clone())
    }
}

/// Asks the inner provider at most once per process.
///
/// [`PromptReason::Confirm`] is never served from the cache, since
/// confirming a passphrase means typing it again.
pub struct CachingProvider<P> {
    inner: P,
    cached: Mutex<Option<Zeroizing<String>>>,
}

impl<P: PassphraseProvider> CachingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cached: Mutex::new(None),
        }
    }
}

impl<P: PassphraseProvider> PassphraseProvider for CachingProvider<P> {
    fn passphrase(&self, reason: PromptReason) -> RecordResult<Zeroizing<String>> {
        if reason == PromptReason::Confirm {
            return self.inner.passphrase(reason);
        }

        let mut cached = self
            .cached
            .lock()
            .map_err(|_| RecordError::Passphrase("passphrase cache poisoned".into()))?;
        if let Some(passphrase) = cached.as_ref() {
            return Ok(passphrase.clone());
        }
        let passphrase = self.inner.passphrase(reason)?;
        *cached = Some(passphrase.clone());
        Ok(passphrase)
    }
}
