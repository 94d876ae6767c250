//! Recovery policies for read errors.
//!
//! When the execution loop fails to read a record it asks the handler's
//! `on_read_error` hook what to do. [`ReadErrorPolicy`] packages the common
//! answers so handlers can delegate to it.

use crate::context::Context;
use crate::error::StreamingError;
use tracing::warn;

/// Counter group used for records skipped by a recovery policy.
pub const COUNTER_GROUP: &str = "ironstream";

/// Counter name for records skipped by a recovery policy.
pub const SKIPPED_RECORDS: &str = "skipped_records";

/// Defines how read failures are handled by a handler that delegates here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadErrorPolicy {
    /// Stop the task at the first read error.
    #[default]
    FailFast,
    /// Skip the bad input silently and continue.
    Skip,
    /// Log the bad input and continue.
    LogAndContinue,
}

impl ReadErrorPolicy {
    /// `FailFast` unless `skip` is set, in which case `LogAndContinue`.
    #[must_use]
    pub fn skipping(skip: bool) -> Self {
        if skip { Self::LogAndContinue } else { Self::FailFast }
    }

    /// Apply the policy: `Ok(())` means continue reading.
    pub fn handle(self, err: StreamingError) -> anyhow::Result<()> {
        match self {
            Self::FailFast => Err(err.into()),
            Self::Skip => Ok(()),
            Self::LogAndContinue => {
                warn!(error = %err, "skipping unreadable input");
                Ok(())
            }
        }
    }

    /// Apply the policy and, when continuing, bump the
    /// `ironstream,skipped_records` counter on the context's side channel.
    pub fn recover<KO, VO>(self, err: StreamingError, ctx: &mut Context<KO, VO>) -> anyhow::Result<()> {
        self.handle(err)?;
        ctx.increment_counter(COUNTER_GROUP, SKIPPED_RECORDS, 1);
        Ok(())
    }
}
