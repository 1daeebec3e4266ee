// crates/devprofile-rs-catalog/src/retry.rs

//! Exponential backoff for transient storage failures.

use crate::error::{CatalogError, StoreError};
use devprofile_rs::config::RetryPolicy;
use log::{debug, warn};
use std::fmt::Display;
use std::thread;
use std::time::Duration;

/// Errors that may succeed when the operation is simply run again.
pub trait Transient: Display {
    fn is_transient(&self) -> bool;
}

impl Transient for StoreError {
    fn is_transient(&self) -> bool {
        StoreError::is_transient(self)
    }
}

impl Transient for CatalogError {
    fn is_transient(&self) -> bool {
        matches!(self, CatalogError::Store(e) if e.is_transient())
    }
}

/// Runs `operation` until it succeeds, fails permanently, or the policy's
/// attempts are used up.
///
/// Only transient errors are retried; every other error is returned from
/// the first attempt. Nothing `operation` borrows is held during the
/// backoff, so callers take their locks inside it.
pub fn with_retry<T, E, F>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    E: Transient,
    F: FnMut() -> Result<T, E>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation() {
            Ok(value) => {
                if attempt > 1 {
                    debug!("'{}' succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(value);
            }
            Err(err) if err.is_transient() && attempt < max_attempts => {
                let backoff = policy.backoff_ms(attempt);
                warn!(
                    "'{}' failed on attempt {}/{} ({}); retrying in {} ms",
                    operation_name, attempt, max_attempts, err, backoff
                );
                thread::sleep(Duration::from_millis(backoff));
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy() -> StoreError {
        StoreError::Sqlite(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        ))
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff_ms: 1,
            multiplier: 2,
        }
    }

    #[test]
    fn test_transient_failure_is_retried() {
        let mut calls = 0;
        let result = with_retry(&fast_policy(3), "test", || {
            calls += 1;
            if calls < 3 { Err(busy()) } else { Ok(calls) }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry(&fast_policy(2), "test", || {
            calls += 1;
            Err(busy())
        });
        assert!(result.unwrap_err().is_transient());
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_permanent_failure_is_not_retried() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry(&fast_policy(5), "test", || {
            calls += 1;
            Err(StoreError::InvalidData("bad".into()))
        });
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_catalog_errors_retry_only_store_contention() {
        assert!(Transient::is_transient(&CatalogError::Store(busy())));
        assert!(!Transient::is_transient(&CatalogError::Poisoned));

        let mut calls = 0;
        let result: Result<(), CatalogError> = with_retry(&fast_policy(3), "test", || {
            calls += 1;
            Err(CatalogError::Poisoned)
        });
        assert!(matches!(result, Err(CatalogError::Poisoned)));
        assert_eq!(calls, 1);
    }
}
