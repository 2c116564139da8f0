use crate::error::{Result, ViewerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Identifier of one dataset fetch, increasing in the order fetches start
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Orders dataset fetches that may complete out of order
///
/// Each fetch takes an id from [`FetchSequencer::issue`] when it starts. Only
/// the completion of the most recently issued fetch is accepted, and only
/// once; anything older would overwrite newer data.
#[derive(Debug, Clone, Default)]
pub struct FetchSequencer {
    issued: u64,
    applied: Option<RequestId>,
}

impl FetchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch, superseding every earlier one
    pub fn issue(&mut self) -> RequestId {
        self.issued += 1;
        let id = RequestId(self.issued);
        debug!("Issued fetch {}", id);
        id
    }

    /// Most recently issued id
    pub fn newest(&self) -> Option<RequestId> {
        (self.issued > 0).then_some(RequestId(self.issued))
    }

    /// Most recently applied id
    pub fn applied(&self) -> Option<RequestId> {
        self.applied
    }

    /// Whether a completion with this id would be accepted
    pub fn is_current(&self, id: RequestId) -> bool {
        self.newest() == Some(id) && self.applied != Some(id)
    }

    /// Check a completion without consuming it
    ///
    /// # Errors
    /// [`ViewerError::StaleFetch`] when `id` is not the newest issued id or
    /// has already been applied.
    pub fn check(&self, id: RequestId) -> Result<()> {
        if self.is_current(id) {
            Ok(())
        } else {
            warn!("Discarding stale fetch {} (newest {:?})", id, self.newest());
            Err(ViewerError::stale_fetch(id, self.newest()))
        }
    }

    /// Record that the completion with this id has been applied
    pub fn mark_applied(&mut self, id: RequestId) {
        self.applied = Some(id);
    }

    /// Check a completion and record it as applied
    pub fn accept(&mut self, id: RequestId) -> Result<()> {
        self.check(id)?;
        self.mark_applied(id);
        Ok(())
    }
}
