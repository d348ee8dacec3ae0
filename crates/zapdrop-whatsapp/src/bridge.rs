use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;
use tracing::debug;

use zapdrop_channels::{Chat, ChannelError, ChannelStatus, ChatTransport, OutboundDocument};

/// HTTP client for the whatsapp-web bridge.
pub struct BridgeClient {
    base_url: String,
    client: reqwest::Client,
    connected: AtomicBool,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    chat_id: &'a str,
    caption: &'a str,
    filename: &'a str,
    /// Base64-encoded file bytes.
    document: String,
}

impl BridgeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            connected: AtomicBool::new(false),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ChatTransport for BridgeClient {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn probe(&self) -> Result<(), ChannelError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionFailed(format!("bridge unreachable: {e}")))?;

        if !response.status().is_success() {
            self.connected.store(false, Ordering::Relaxed);
            return Err(ChannelError::ConnectionFailed(format!(
                "bridge health returned {}",
                response.status()
            )));
        }

        self.connected.store(true, Ordering::Relaxed);
        tracing::info!(base_url = %self.base_url, "whatsapp bridge reachable");
        Ok(())
    }

    async fn list_chats(&self) -> Result<Vec<Chat>, ChannelError> {
        let response = self
            .client
            .get(self.url("/chats"))
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionFailed(format!("chat listing failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ChannelError::ConnectionFailed(format!(
                "chat listing returned {}",
                response.status()
            )));
        }

        let chats: Vec<Chat> = response
            .json()
            .await
            .map_err(|e| ChannelError::InvalidResponse(format!("bad chat list payload: {e}")))?;

        debug!(count = chats.len(), "chat list fetched");
        Ok(chats)
    }

    async fn send_document(&self, doc: &OutboundDocument) -> Result<(), ChannelError> {
        // Bytes are read at send time, once per target: the file is owned by
        // the firing for its whole duration, so this never races cleanup.
        let bytes = tokio::fs::read(&doc.path)
            .await
            .map_err(|e| ChannelError::AttachmentUnreadable(format!("{}: {e}", doc.path.display())))?;

        let filename = doc
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf");

        let body = SendRequest {
            chat_id: &doc.chat_id,
            caption: &doc.caption,
            filename,
            document: base64::engine::general_purpose::STANDARD.encode(&bytes),
        };

        let response = self
            .client
            .post(self.url("/send"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed(format!("bridge send failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed(format!(
                "bridge send returned {status}: {text}"
            )));
        }

        debug!(chat_id = %doc.chat_id, bytes = bytes.len(), "document delivered to bridge");
        Ok(())
    }

    fn status(&self) -> ChannelStatus {
        if self.connected.load(Ordering::Relaxed) {
            ChannelStatus::Connected
        } else {
            ChannelStatus::Disconnected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn probe_marks_client_connected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = BridgeClient::new(&server.uri());
        client.probe().await.unwrap();
        assert!(matches!(client.status(), ChannelStatus::Connected));
    }

    #[tokio::test]
    async fn probe_failure_is_connection_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = BridgeClient::new(&server.uri());
        let err = client.probe().await.unwrap_err();
        assert!(matches!(err, ChannelError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn list_chats_decodes_id_and_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "111@g.us", "name": "Family"},
                {"id": "222@c.us", "name": "Work"},
            ])))
            .mount(&server)
            .await;

        let client = BridgeClient::new(&server.uri());
        let chats = client.list_chats().await.unwrap();
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].name, "Family");
        assert_eq!(chats[1].id, "222@c.us");
    }

    #[tokio::test]
    async fn send_posts_base64_document_with_caption() {
        let server = MockServer::start().await;
        let payload = b"%PDF-1.4 fixture";
        let dir = std::env::temp_dir().join("zapdrop-bridge-send");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("relatorio.pdf");
        std::fs::write(&file, payload).unwrap();

        let expected_b64 = base64::engine::general_purpose::STANDARD.encode(payload);
        Mock::given(method("POST"))
            .and(path("/send"))
            .and(body_partial_json(json!({
                "chat_id": "111@g.us",
                "caption": "Hello",
                "filename": "relatorio.pdf",
                "document": expected_b64,
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = BridgeClient::new(&server.uri());
        let doc = OutboundDocument {
            chat_id: "111@g.us".into(),
            caption: "Hello".into(),
            path: file.clone(),
        };
        client.send_document(&doc).await.unwrap();
        std::fs::remove_file(&file).ok();
    }

    #[tokio::test]
    async fn non_success_send_is_send_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .respond_with(ResponseTemplate::new(500).set_body_string("browser crashed"))
            .mount(&server)
            .await;

        let dir = std::env::temp_dir().join("zapdrop-bridge-err");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("doc.pdf");
        std::fs::write(&file, b"%PDF").unwrap();

        let client = BridgeClient::new(&server.uri());
        let doc = OutboundDocument {
            chat_id: "111@g.us".into(),
            caption: "".into(),
            path: file.clone(),
        };
        let err = client.send_document(&doc).await.unwrap_err();
        assert!(matches!(err, ChannelError::SendFailed(_)));
        std::fs::remove_file(&file).ok();
    }

    #[tokio::test]
    async fn unreadable_attachment_never_reaches_the_bridge() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = BridgeClient::new(&server.uri());
        let doc = OutboundDocument {
            chat_id: "111@g.us".into(),
            caption: "".into(),
            path: "/nonexistent/zapdrop-missing.pdf".into(),
        };
        let err = client.send_document(&doc).await.unwrap_err();
        assert!(matches!(err, ChannelError::AttachmentUnreadable(_)));
    }
}
