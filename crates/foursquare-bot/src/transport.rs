//! Line-delimited JSON host: one inbound message per input line, one reply
//! per output line.

use anyhow::{Context, Result};
use async_trait::async_trait;
use foursquare_client::VenueSearch;
use tokio::{
    io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    sync::Mutex,
};
use tracing::{debug, error, info, warn};

use crate::{
    handler::{FoursquareHandler, HandleOutcome},
    message::{ChatClient, InboundMessage, OutboundReply},
};

/// Writes each reply as a JSON line.
#[derive(Debug)]
pub struct JsonLinesClient<W> {
    writer: Mutex<W>,
}

impl<W> JsonLinesClient<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> ChatClient for JsonLinesClient<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send_message(&self, reply: OutboundReply) -> Result<()> {
        let payload = serde_json::to_string(&reply).context("failed to encode reply")?;
        let mut writer = self.writer.lock().await;
        writer.write_all(payload.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }
}

pub async fn serve_stdio<S: VenueSearch>(handler: &FoursquareHandler<S>) -> Result<()> {
    let reader = BufReader::new(io::stdin());
    let client = JsonLinesClient::new(io::stdout());
    serve_lines(handler, reader, &client).await
}

pub async fn serve_lines<S, R, C>(
    handler: &FoursquareHandler<S>,
    mut reader: R,
    client: &C,
) -> Result<()>
where
    S: VenueSearch,
    R: AsyncBufRead + Unpin,
    C: ChatClient + ?Sized,
{
    let mut buffer = String::new();
    loop {
        buffer.clear();
        let bytes = reader.read_line(&mut buffer).await?;
        if bytes == 0 {
            info!(target: "foursquare_transport", "Input closed; shutting down");
            break;
        }

        let line = buffer.trim();
        if line.is_empty() {
            continue;
        }

        let message = match serde_json::from_str::<InboundMessage>(line) {
            Ok(message) => message,
            Err(error) => {
                warn!(target: "foursquare_transport", error = %error, "Failed to parse message");
                continue;
            }
        };

        match handler.process(&message, client).await {
            Ok(HandleOutcome::Ignored) => {
                debug!(target: "foursquare_transport", "Message not addressed to bot");
            }
            Ok(outcome) => {
                debug!(target: "foursquare_transport", ?outcome, "Message handled");
            }
            Err(error) => {
                error!(target: "foursquare_transport", error = %error, "Message handling failed");
            }
        }
    }

    Ok(())
}
