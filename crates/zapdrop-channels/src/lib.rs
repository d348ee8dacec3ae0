pub mod channel;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod types;

pub use channel::ChatTransport;
pub use directory::resolve;
pub use dispatch::{run_firing, FiringReport};
pub use error::ChannelError;
pub use types::{Chat, ChannelStatus, OutboundDocument};
