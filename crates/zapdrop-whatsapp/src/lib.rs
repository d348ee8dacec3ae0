//! WhatsApp transport backed by a local whatsapp-web bridge.
//!
//! The bridge process owns the browser session, QR pairing, and session
//! persistence; this crate only consumes its small HTTP surface:
//!
//! | Route        | Purpose                                  |
//! |--------------|------------------------------------------|
//! | `GET /health`| readiness probe                          |
//! | `GET /chats` | full chat list (`[{"id", "name"}, …]`)   |
//! | `POST /send` | deliver a base64 document with a caption |

pub mod bridge;

pub use bridge::BridgeClient;
