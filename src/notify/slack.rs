use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{MessageHandle, Notifier, Sender};
use crate::config::SlackConfig;
use crate::error::{Error, Result};

/// Slack Web API `chat.postMessage` for the threaded channel plus an incoming
/// webhook for the plain channel.
pub struct SlackNotifier {
    client: reqwest::Client,
    api_url: String,
    token: String,
    channel: String,
    webhook_url: Option<String>,
    webhook_username: String,
}

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    username: &'a str,
    icon_emoji: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread_ts: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    text: &'a str,
    username: &'a str,
    link_names: u8,
}

impl SlackNotifier {
    /// Reads the token and webhook URL from the environment variables named in
    /// the config. The webhook is optional; the token is not.
    pub fn from_config(slack: &SlackConfig) -> Result<Self> {
        let token = std::env::var(&slack.token_env)
            .map_err(|_| Error::Config(format!("environment variable {} is not set", slack.token_env)))?;
        if slack.channel.is_empty() {
            return Err(Error::Config("slack.channel is empty".to_string()));
        }
        let webhook_url = std::env::var(&slack.webhook_env).ok();

        Ok(SlackNotifier {
            client: reqwest::Client::new(),
            api_url: slack.api_url.clone(),
            token,
            channel: slack.channel.clone(),
            webhook_url,
            webhook_username: format!("stat bot ({})", local_hostname()),
        })
    }
}

fn local_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string())
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn post(
        &self,
        text: &str,
        sender: &Sender,
        thread: Option<&MessageHandle>,
    ) -> Result<MessageHandle> {
        let body = PostMessage {
            channel: &self.channel,
            text,
            username: &sender.username,
            icon_emoji: &sender.icon,
            thread_ts: thread.map(|MessageHandle(ts)| ts.as_str()),
        };
        tracing::debug!(channel = %self.channel, threaded = thread.is_some(), "posting message");

        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Error::Notify(format!("chat.postMessage returned {}", res.status())));
        }
        let reply: PostMessageResponse = res.json().await?;
        if !reply.ok {
            return Err(Error::Notify(
                reply.error.unwrap_or_else(|| "unknown slack error".to_string()),
            ));
        }
        reply
            .ts
            .map(MessageHandle)
            .ok_or_else(|| Error::Notify("chat.postMessage reply has no ts".to_string()))
    }

    async fn post_webhook(&self, text: &str) -> Result<()> {
        let Some(url) = &self.webhook_url else {
            return Err(Error::Config(
                "webhook URL is not configured; set the variable named by slack.webhook_env"
                    .to_string(),
            ));
        };
        let body = WebhookMessage {
            text,
            username: &self.webhook_username,
            link_names: 1,
        };
        let res = self.client.post(url).json(&body).send().await?;
        if !res.status().is_success() {
            return Err(Error::Notify(format!("webhook returned {}", res.status())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_ts_is_omitted_for_top_level_posts() {
        let body = PostMessage {
            channel: "C123",
            text: "hi",
            username: "mirai",
            icon_emoji: ":ssh-mirai:",
            thread_ts: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("thread_ts"));
        assert!(json.contains("\"icon_emoji\":\":ssh-mirai:\""));
    }

    #[test]
    fn error_reply_is_parsed() {
        let reply: PostMessageResponse =
            serde_json::from_str(r#"{"ok":false,"error":"channel_not_found"}"#).unwrap();
        assert!(!reply.ok);
        assert_eq!(reply.error.as_deref(), Some("channel_not_found"));
        assert_eq!(reply.ts, None);
    }

    #[tokio::test]
    async fn webhook_without_url_is_an_error() {
        let notifier = SlackNotifier {
            client: reqwest::Client::new(),
            api_url: "http://127.0.0.1:9/api/chat.postMessage".to_string(),
            token: "xoxb-test".to_string(),
            channel: "C123".to_string(),
            webhook_url: None,
            webhook_username: "stat bot (head)".to_string(),
        };
        let err = notifier.post_webhook("`mirai updates:`").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn webhook_username_names_this_host() {
        let name = local_hostname();
        assert!(!name.is_empty());
        assert_ne!(name, "unknown");
    }

    #[test]
    fn webhook_links_names() {
        let body = WebhookMessage {
            text: "@tanaka",
            username: "stat bot (head)",
            link_names: 1,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"text":"@tanaka","username":"stat bot (head)","link_names":1}"#
        );
    }
}
