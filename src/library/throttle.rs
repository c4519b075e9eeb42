// MyLibrary - Personal Book Tracking Service
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Call-throttling policy keyed by operation name
//!
//! Optional policy object injected into the library service for single-user
//! deployments that want to damp accidental request storms. State is owned by
//! the limiter instance, so multiple service instances compose correctly;
//! there is no ambient global cache.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::{LibraryError, Result};

/// Per-operation rate limiter
///
/// Allows one call per operation name within the configured window.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    last_called: Mutex<HashMap<String, Instant>>,
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_called: Mutex::new(HashMap::new()),
        }
    }

    /// Record a call for `operation`, failing if one happened within the window
    pub fn check(&self, operation: &str) -> Result<()> {
        let now = Instant::now();
        let mut last_called = self
            .last_called
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(last) = last_called.get(operation) {
            let elapsed = now.duration_since(*last);
            if elapsed < self.window {
                let retry_after = self.window - elapsed;
                return Err(LibraryError::RateLimitExceeded {
                    operation: operation.to_string(),
                    retry_after_ms: retry_after.as_millis() as u64,
                });
            }
        }

        last_called.insert(operation.to_string(), now);
        Ok(())
    }
}
