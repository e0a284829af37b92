use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bounded<T> {
    Completed(T),
    TimedOut,
}

/// Run `op` for at most `limit`. On expiry the future is dropped, which cancels it
/// and kills any child process spawned with `kill_on_drop`.
pub async fn with_deadline<F: Future>(limit: Duration, op: F) -> Bounded<F::Output> {
    match tokio::time::timeout(limit, op).await {
        Ok(value) => Bounded::Completed(value),
        Err(_) => Bounded::TimedOut,
    }
}
