//! Logging channel sender: records deliveries instead of contacting providers.

use std::collections::{HashSet, VecDeque};
use std::future::{Future, ready};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use remindhub_app::ports::{ChannelSender, SendError};
use remindhub_domain::render::RenderedMessage;
use remindhub_domain::rule::Channel;

/// One accepted delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub channel: Channel,
    pub address: String,
    pub message: RenderedMessage,
}

/// Default number of deliveries kept in the outbox.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 1000;

#[derive(Default)]
struct State {
    outbox: VecDeque<Delivery>,
    rejected: HashSet<String>,
}

/// [`ChannelSender`] that logs each delivery at `info` and keeps the most
/// recent ones in a bounded outbox.
///
/// Addresses registered with [`LoggingChannelSender::reject`] fail, which
/// makes provider outages reproducible in demos and tests.
#[derive(Clone)]
pub struct LoggingChannelSender {
    state: Arc<Mutex<State>>,
    outbox_capacity: usize,
}

impl Default for LoggingChannelSender {
    fn default() -> Self {
        Self::with_outbox_capacity(DEFAULT_OUTBOX_CAPACITY)
    }
}

impl LoggingChannelSender {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` deliveries (at least one); older ones are
    /// dropped first.
    #[must_use]
    pub fn with_outbox_capacity(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            outbox_capacity: capacity.max(1),
        }
    }

    /// Make every send to `address` fail.
    pub fn reject(&self, address: impl Into<String>) {
        self.lock().rejected.insert(address.into());
    }

    /// Retained deliveries, oldest first.
    #[must_use]
    pub fn outbox(&self) -> Vec<Delivery> {
        self.lock().outbox.iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn deliver(
        &self,
        channel: Channel,
        address: &str,
        message: &RenderedMessage,
    ) -> Result<(), SendError> {
        let mut state = self.lock();
        if state.rejected.contains(address) {
            return Err(SendError::Rejected(format!("{channel} address {address} rejected")));
        }
        tracing::info!(
            %channel,
            address,
            recipient_id = %message.recipient_id,
            title = %message.title,
            "message delivered"
        );
        while state.outbox.len() >= self.outbox_capacity {
            state.outbox.pop_front();
        }
        state.outbox.push_back(Delivery {
            channel,
            address: address.to_string(),
            message: message.clone(),
        });
        Ok(())
    }
}

impl ChannelSender for LoggingChannelSender {
    fn send_push(
        &self,
        address: &str,
        message: &RenderedMessage,
    ) -> impl Future<Output = Result<(), SendError>> + Send {
        ready(self.deliver(Channel::Push, address, message))
    }

    fn send_email(
        &self,
        address: &str,
        message: &RenderedMessage,
    ) -> impl Future<Output = Result<(), SendError>> + Send {
        ready(self.deliver(Channel::Email, address, message))
    }

    fn send_sms(
        &self,
        address: &str,
        message: &RenderedMessage,
    ) -> impl Future<Output = Result<(), SendError>> + Send {
        ready(self.deliver(Channel::Sms, address, message))
    }
}
