use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{MessageHandle, Notifier, Sender};
use crate::error::Result;

/// Prints messages instead of posting them; used for dry runs.
#[derive(Debug, Default)]
pub struct StdoutNotifier {
    counter: AtomicUsize,
}

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn post(
        &self,
        text: &str,
        sender: &Sender,
        thread: Option<&MessageHandle>,
    ) -> Result<MessageHandle> {
        let id = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        match thread {
            Some(MessageHandle(parent)) => {
                println!("--- [{id}] {} {} (reply to {parent})", sender.icon, sender.username)
            }
            None => println!("--- [{id}] {} {}", sender.icon, sender.username),
        }
        println!("{text}");
        Ok(MessageHandle(format!("dry-run-{id}")))
    }

    async fn post_webhook(&self, text: &str) -> Result<()> {
        println!("--- [webhook]");
        println!("{text}");
        Ok(())
    }
}
