use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An addressable messaging destination (individual or group) as reported by
/// the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    /// Platform-native identifier, e.g. `"5511999999999@c.us"`.
    pub id: String,

    /// Human-readable display name.
    pub name: String,
}

/// A file message to be delivered to one chat.
#[derive(Debug, Clone)]
pub struct OutboundDocument {
    /// Platform-native identifier of the recipient chat.
    pub chat_id: String,

    /// Caption shown alongside the file.
    pub caption: String,

    /// Path of the file on local disk.
    pub path: PathBuf,
}

/// Runtime connection state of a transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    /// Fully connected and ready to send.
    Connected,

    /// Attempting to establish or re-establish the connection.
    Connecting,

    /// Cleanly disconnected (not an error condition).
    Disconnected,

    /// An unrecoverable (or pre-retry) error occurred.
    Error(String),
}
