use thiserror::Error;

/// Errors that can occur while talking to a chat transport.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The underlying transport could not be reached.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A message could not be delivered to the remote endpoint.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// No chat matched the requested name or id.
    #[error("Chat not found: {name}")]
    ChatNotFound { name: String },

    /// The transport returned a payload we could not decode.
    #[error("Invalid transport response: {0}")]
    InvalidResponse(String),

    /// The attachment could not be read from disk.
    #[error("Attachment unreadable: {0}")]
    AttachmentUnreadable(String),
}
