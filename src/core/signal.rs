//! Resettable boolean signal with waitable edges.
//!
//! A [`Signal`] holds one bit as a pair of one-shot tokens. The ON-token is
//! live while the bit is ON and the OFF-token is live while the bit is OFF.
//! Flipping the bit cancels the token of the value being left, which wakes
//! everyone waiting for the new value, and installs a fresh token for the value
//! being entered so the bit can later flip back.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_util::sync::CancellationToken;

const ON: bool = true;
const OFF: bool = false;

#[derive(Debug)]
struct Tokens {
    on: CancellationToken,
    off: CancellationToken,
    released: bool,
}

impl Tokens {
    fn is_on(&self) -> bool {
        !self.on.is_cancelled()
    }

    fn token(&self, value: bool) -> &CancellationToken {
        if value {
            &self.on
        } else {
            &self.off
        }
    }

    fn turn(&mut self, value: bool) -> bool {
        if self.released || self.is_on() == value {
            return false;
        }

        let fresh = CancellationToken::new();
        self.token(!value).cancel();
        if value {
            self.on = fresh;
        } else {
            self.off = fresh;
        }
        true
    }
}

/// One boolean bit that can be waited on in both directions.
#[derive(Debug)]
pub(crate) struct Signal {
    tokens: RwLock<Tokens>,
}

impl Signal {
    pub(crate) fn new(initially_on: bool) -> Self {
        let tokens = Tokens {
            on: CancellationToken::new(),
            off: CancellationToken::new(),
            released: false,
        };
        tokens.token(!initially_on).cancel();

        Self {
            tokens: RwLock::new(tokens),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Tokens> {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tokens> {
        self.tokens.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_on(&self) -> bool {
        self.read().is_on()
    }

    /// Turn the bit ON. Returns `false` if it already was.
    pub(crate) fn set_on(&self) -> bool {
        self.write().turn(ON)
    }

    /// Turn the bit OFF. Returns `false` if it already was.
    pub(crate) fn set_off(&self) -> bool {
        self.write().turn(OFF)
    }

    /// Token cancelled once the bit is ON.
    ///
    /// This is the OFF-token: turning the bit ON is what cancels it. If the
    /// bit is ON already the returned token is cancelled already.
    pub(crate) fn on_edge(&self) -> CancellationToken {
        self.read().off.clone()
    }

    /// Token cancelled once the bit is OFF.
    pub(crate) fn off_edge(&self) -> CancellationToken {
        self.read().on.clone()
    }

    /// Cancel both tokens, waking every waiter. The bit is frozen afterwards.
    pub(crate) fn release(&self) {
        let mut tokens = self.write();
        tokens.on.cancel();
        tokens.off.cancel();
        tokens.released = true;
    }
}
