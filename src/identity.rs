// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::errors::AuthError;
use crate::models::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
            photo_url: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

impl From<&Identity> for Session {
    fn from(id: &Identity) -> Self {
        Session {
            uid: id.uid.clone(),
            email: id.email.clone(),
            display_name: id.display_name.clone(),
            photo_url: id.photo_url.clone(),
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current identity plus every later change. `None` means signed out.
    fn identity_changes(&self) -> watch::Receiver<Option<Identity>>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// In-process identity provider: whoever calls `sign_in` is the user.
#[derive(Debug)]
pub struct LocalIdentity {
    tx: watch::Sender<Option<Identity>>,
    fail_sign_out: AtomicBool,
}

impl Default for LocalIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalIdentity {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            tx,
            fail_sign_out: AtomicBool::new(false),
        }
    }

    pub fn signed_in(identity: Identity) -> Self {
        let me = Self::new();
        me.sign_in(identity);
        me
    }

    pub fn sign_in(&self, identity: Identity) {
        self.tx.send_replace(Some(identity));
    }

    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    pub fn set_sign_out_failure(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentity {
    fn identity_changes(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(AuthError::SignOut("provider refused sign-out".into()));
        }
        if self.tx.borrow().is_none() {
            return Err(AuthError::NotSignedIn);
        }
        self.tx.send_replace(None);
        Ok(())
    }
}
