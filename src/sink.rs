// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Mutex;

use crate::store::lock;

/// Where swallowed failures go.
pub trait ErrorSink: Send + Sync {
    fn report(&self, context: &str, error: &anyhow::Error);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, context: &str, error: &anyhow::Error) {
        tracing::error!(context, error = %format!("{:#}", error), "operation failed");
    }
}

/// Keeps every report in memory; also forwards to tracing.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<String> {
        lock(&self.reports).clone()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.reports).is_empty()
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, context: &str, error: &anyhow::Error) {
        TracingSink.report(context, error);
        lock(&self.reports).push(format!("{}: {:#}", context, error));
    }
}
