// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::store::CollectionKind;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
    #[error("write of {kind} rejected for user '{user}': {reason}")]
    Rejected {
        user: String,
        kind: CollectionKind,
        reason: String,
    },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no signed-in user")]
    NotSignedIn,
    #[error("sign-out failed: {0}")]
    SignOut(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount must be non-negative, got {0}")]
    NegativeAmount(Decimal),
    #[error("budget limit must be positive, got {0}")]
    NonPositiveLimit(Decimal),
    #[error("goal target must be positive, got {0}")]
    NonPositiveTarget(Decimal),
    #[error("saved amount must be non-negative, got {0}")]
    NegativeSaved(Decimal),
    #[error("identifier must not be empty")]
    EmptyId,
    #[error("unknown currency '{0}'")]
    UnknownCurrency(String),
}
