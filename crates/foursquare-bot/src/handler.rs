use foursquare_client::{ClientError, FoursquareClient, VenueSearch};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    extract::search_params,
    format::{venues_reply, HELP_TEXT, INVALID_REQUEST, USAGE},
    message::{ChatClient, InboundMessage},
    settings::ApiKey,
    triage::{is_help_request, is_triggered},
};

#[derive(Debug, Error)]
pub enum HandlerError {
    /// No HTTP response was obtained; left for the host to deal with.
    #[error("venue search transport failed: {0}")]
    Transport(#[source] ClientError),
    #[error("failed to send reply: {0:#}")]
    Send(anyhow::Error),
}

/// Terminal state reached for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleOutcome {
    Ignored,
    Help,
    Invalid,
    Venues { count: usize },
}

/// Answers `@foursquare` messages with nearby venues.
///
/// Holds nothing mutable, so one instance can serve concurrent messages.
#[derive(Debug)]
pub struct FoursquareHandler<S = FoursquareClient> {
    search: S,
    api_key: ApiKey,
}

impl<S: VenueSearch> FoursquareHandler<S> {
    pub fn new(search: S, api_key: ApiKey) -> Self {
        Self { search, api_key }
    }

    pub fn usage(&self) -> &'static str {
        USAGE
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    pub fn triage_message(&self, message: &InboundMessage) -> bool {
        is_triggered(&message.content)
    }

    /// Triage plus handling; untriggered messages are dropped silently.
    pub async fn process<C>(
        &self,
        message: &InboundMessage,
        client: &C,
    ) -> Result<HandleOutcome, HandlerError>
    where
        C: ChatClient + ?Sized,
    {
        if !self.triage_message(message) {
            return Ok(HandleOutcome::Ignored);
        }
        self.handle_message(message, client).await
    }

    /// Handles a message already known to be addressed to the bot.
    pub async fn handle_message<C>(
        &self,
        message: &InboundMessage,
        client: &C,
    ) -> Result<HandleOutcome, HandlerError>
    where
        C: ChatClient + ?Sized,
    {
        if is_help_request(&message.content) {
            debug!(target: "foursquare_bot", sender = %message.sender_email, "Help requested");
            send(message, HELP_TEXT, client).await?;
            return Ok(HandleOutcome::Help);
        }

        let params = search_params(&message.content, self.api_key.expose());
        if params.near.is_none() {
            warn!(
                target: "foursquare_bot",
                content = %message.content,
                "No quoted location found; searching without near"
            );
        }

        let response = match self.search.search_venues(&params).await {
            Ok(response) => response,
            Err(error) if error.is_transport() => return Err(HandlerError::Transport(error)),
            Err(error) => {
                warn!(target: "foursquare_bot", error = %error, "Venue search failed");
                send(message, INVALID_REQUEST, client).await?;
                return Ok(HandleOutcome::Invalid);
            }
        };

        if !response.is_success() {
            warn!(
                target: "foursquare_bot",
                code = response.meta.code,
                error_type = ?response.meta.error_type,
                error_detail = ?response.meta.error_detail,
                "Venue search rejected by API"
            );
            send(message, INVALID_REQUEST, client).await?;
            return Ok(HandleOutcome::Invalid);
        }

        let venues = response.venues();
        let content = venues_reply(params.near.as_deref(), venues);
        send(message, content, client).await?;

        info!(
            target: "foursquare_bot",
            near = ?params.near,
            venues = venues.len(),
            "Answered venue search"
        );
        Ok(HandleOutcome::Venues {
            count: venues.len(),
        })
    }
}

async fn send<C>(
    message: &InboundMessage,
    content: impl Into<String>,
    client: &C,
) -> Result<(), HandlerError>
where
    C: ChatClient + ?Sized,
{
    client
        .send_message(message.reply(content))
        .await
        .map_err(HandlerError::Send)
}
