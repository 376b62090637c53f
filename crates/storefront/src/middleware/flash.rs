//! One-shot flash messages stored in the session.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{FlashMessage, session_keys};

/// Extractor that drains the session's pending flash messages.
///
/// Use it only in handlers that render a page: the messages are removed from
/// the session as soon as they are extracted.
#[derive(Debug, Default)]
pub struct Flashes(pub Vec<FlashMessage>);

impl<S> FromRequestParts<S> for Flashes
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self::default());
        };

        let messages = session
            .remove::<Vec<FlashMessage>>(session_keys::FLASH_MESSAGES)
            .await?
            .unwrap_or_default();

        Ok(Self(messages))
    }
}

/// Queue a flash message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn push_flash(
    session: &Session,
    message: FlashMessage,
) -> Result<(), tower_sessions::session::Error> {
    let mut queue = session
        .get::<Vec<FlashMessage>>(session_keys::FLASH_MESSAGES)
        .await?
        .unwrap_or_default();
    queue.push(message);
    session.insert(session_keys::FLASH_MESSAGES, queue).await
}
