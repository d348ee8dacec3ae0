use async_trait::async_trait;

use crate::{
    error::ChannelError,
    types::{Chat, ChannelStatus, OutboundDocument},
};

/// Common interface to a chat transport (WhatsApp bridge today, anything
/// with named chats and file messages tomorrow).
///
/// Implementations must be `Send + Sync` so a single `Arc<dyn ChatTransport>`
/// can be shared by every firing task.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Stable lowercase identifier for this transport (e.g. `"whatsapp"`).
    fn name(&self) -> &str;

    /// Verify the transport is reachable. Called once at process start;
    /// session recovery behind the transport is treated as transparent.
    async fn probe(&self) -> Result<(), ChannelError>;

    /// Fetch the full list of known chats.
    async fn list_chats(&self) -> Result<Vec<Chat>, ChannelError>;

    /// Deliver a single file message with caption to one chat.
    async fn send_document(&self, doc: &OutboundDocument) -> Result<(), ChannelError>;

    /// Return the current runtime status without blocking.
    fn status(&self) -> ChannelStatus;
}
