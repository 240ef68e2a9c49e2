//! Channel port: delivery of rendered messages.

use std::future::Future;
use std::time::Duration;

use remindhub_domain::render::RenderedMessage;

/// Why a single delivery attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The provider refused or could not deliver the message.
    #[error("{0}")]
    Rejected(String),
    /// No answer within the configured send timeout.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Outbound delivery on the supported channels.
pub trait ChannelSender: Send + Sync {
    fn send_push(
        &self,
        address: &str,
        message: &RenderedMessage,
    ) -> impl Future<Output = Result<(), SendError>> + Send;

    fn send_email(
        &self,
        address: &str,
        message: &RenderedMessage,
    ) -> impl Future<Output = Result<(), SendError>> + Send;

    fn send_sms(
        &self,
        address: &str,
        message: &RenderedMessage,
    ) -> impl Future<Output = Result<(), SendError>> + Send;
}
