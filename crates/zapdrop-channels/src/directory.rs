//! Chat directory lookup — resolves a free-text name to a chat handle.
//!
//! Matching is exact, first-hit-wins, against either the display name or the
//! platform-native id. No fuzzy matching, no case folding: a renamed chat
//! silently stops matching, which is why resolution happens at fire time
//! rather than registration time.

use crate::{channel::ChatTransport, error::ChannelError, types::Chat};

/// Scan `chats` for the first entry whose name or id equals `name` exactly.
pub fn find_in<'a>(chats: &'a [Chat], name: &str) -> Option<&'a Chat> {
    chats.iter().find(|c| c.name == name || c.id == name)
}

/// Fetch the full chat list from the transport and resolve `name`.
///
/// `Ok(None)` is a miss (the caller decides whether to skip or abort);
/// `Err` means the listing itself failed.
pub async fn resolve(
    transport: &dyn ChatTransport,
    name: &str,
) -> Result<Option<Chat>, ChannelError> {
    let chats = transport.list_chats().await?;
    Ok(find_in(&chats, name).cloned())
}
