//! Message delivery. The monitor only needs a handle it can thread replies under.

mod slack;
mod stdout;

use async_trait::async_trait;

use crate::error::Result;

pub use slack::SlackNotifier;
pub use stdout::StdoutNotifier;

/// Who a threaded message appears to come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub username: String,
    pub icon: String,
}

/// Identifier of a posted message, usable as a thread anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHandle(pub String);

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post to the threaded channel, optionally as a reply under `thread`.
    async fn post(
        &self,
        text: &str,
        sender: &Sender,
        thread: Option<&MessageHandle>,
    ) -> Result<MessageHandle>;

    /// Post to the plain webhook channel.
    async fn post_webhook(&self, text: &str) -> Result<()>;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Box<T> {
    async fn post(
        &self,
        text: &str,
        sender: &Sender,
        thread: Option<&MessageHandle>,
    ) -> Result<MessageHandle> {
        (**self).post(text, sender, thread).await
    }

    async fn post_webhook(&self, text: &str) -> Result<()> {
        (**self).post_webhook(text).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Posted {
        pub text: String,
        pub sender: Option<Sender>,
        pub thread: Option<MessageHandle>,
    }

    /// Records every delivery; handles are `ts-<n>`.
    #[derive(Default)]
    pub struct RecordingNotifier {
        posts: Mutex<Vec<Posted>>,
        webhook_down: bool,
    }

    impl RecordingNotifier {
        /// Every webhook post fails and is not recorded.
        pub fn without_webhook() -> Self {
            RecordingNotifier {
                webhook_down: true,
                ..Self::default()
            }
        }

        pub fn posts(&self) -> Vec<Posted> {
            self.posts.lock().unwrap().clone()
        }

        pub fn texts(&self) -> Vec<String> {
            self.posts().into_iter().map(|p| p.text).collect()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn post(
            &self,
            text: &str,
            sender: &Sender,
            thread: Option<&MessageHandle>,
        ) -> Result<MessageHandle> {
            let mut posts = self.posts.lock().unwrap();
            posts.push(Posted {
                text: text.to_string(),
                sender: Some(sender.clone()),
                thread: thread.cloned(),
            });
            Ok(MessageHandle(format!("ts-{}", posts.len())))
        }

        async fn post_webhook(&self, text: &str) -> Result<()> {
            if self.webhook_down {
                return Err(crate::error::Error::Notify("webhook unreachable".to_string()));
            }
            self.posts.lock().unwrap().push(Posted {
                text: text.to_string(),
                sender: None,
                thread: None,
            });
            Ok(())
        }
    }
}
