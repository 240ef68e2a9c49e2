//! Multi-channel dispatcher: one rendered message, every declared channel.
//!
//! Channels are attempted one at a time and independently: a missing
//! address skips the channel, a failed or timed-out send is reported for
//! that channel only and never stops the remaining attempts.

use std::time::Duration;

use remindhub_domain::execution::ChannelOutcome;
use remindhub_domain::recipient::Recipient;
use remindhub_domain::render::RenderedMessage;
use remindhub_domain::rule::Channel;

use crate::ports::{ChannelSender, SendError};

/// Default bound on a single send.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends rendered messages through a [`ChannelSender`].
pub struct Dispatcher<S> {
    sender: S,
    timeout: Duration,
}

impl<S: ChannelSender> Dispatcher<S> {
    pub fn new(sender: S) -> Self {
        Self {
            sender,
            timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Bound every send by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attempt every channel in order and report one outcome per channel.
    pub async fn dispatch(
        &self,
        message: &RenderedMessage,
        recipient: &Recipient,
        channels: &[Channel],
    ) -> Vec<(Channel, ChannelOutcome)> {
        let mut outcomes = Vec::with_capacity(channels.len());

        for &channel in channels {
            let outcome = match recipient.address(channel) {
                None => {
                    tracing::debug!(
                        recipient_id = %recipient.id,
                        %channel,
                        "no address, channel skipped"
                    );
                    ChannelOutcome::Skipped
                }
                Some(address) => match self.send(channel, address, message).await {
                    Ok(()) => ChannelOutcome::Sent,
                    Err(err) => {
                        tracing::warn!(
                            %err,
                            recipient_id = %recipient.id,
                            %channel,
                            "delivery failed"
                        );
                        ChannelOutcome::Failed(err.to_string())
                    }
                },
            };
            outcomes.push((channel, outcome));
        }

        outcomes
    }

    async fn send(
        &self,
        channel: Channel,
        address: &str,
        message: &RenderedMessage,
    ) -> Result<(), SendError> {
        let attempt = async {
            match channel {
                Channel::Push => self.sender.send_push(address, message).await,
                Channel::Email => self.sender.send_email(address, message).await,
                Channel::Sms => self.sender.send_sms(address, message).await,
            }
        };
        tokio::time::timeout(self.timeout, attempt)
            .await
            .map_err(|_| SendError::Timeout(self.timeout))?
    }
}
