//! Channel subscription and unsubscription operations.

use tracing::info;

use super::{WsWriter, send};
use crate::Result;
use crate::models::{RedactedToken, Subscribe, Subscription, Unsubscribe};

/// Subscribes `pairs` to the channel described by `subscription`.
///
/// Pass a `token` on the private stream; it replaces any token already
/// set on `subscription`. Private channels take an empty `pairs` slice.
///
/// # Errors
///
/// Returns a [`FeedError`](crate::FeedError) if sending the subscription message fails.
pub async fn subscribe(
    write: &mut WsWriter,
    pairs: &[String],
    subscription: Subscription,
    token: Option<&RedactedToken>,
    verbose: bool,
) -> Result<()> {
    let subscription = with_token(subscription, token);
    let name = subscription.name.clone();
    let request = Subscribe::new(pairs, subscription);
    send(write, &request, verbose).await?;
    info!(channel = %name, ?pairs, "Subscribed to channel");

    Ok(())
}

/// Unsubscribes `pairs` from the channel described by `subscription`.
///
/// # Errors
///
/// Returns a [`FeedError`](crate::FeedError) if sending the unsubscribe message fails.
pub async fn unsubscribe(
    write: &mut WsWriter,
    pairs: &[String],
    subscription: Subscription,
    token: Option<&RedactedToken>,
    verbose: bool,
) -> Result<()> {
    let subscription = with_token(subscription, token);
    let name = subscription.name.clone();
    let request = Unsubscribe::new(pairs, subscription);
    send(write, &request, verbose).await?;
    info!(channel = %name, ?pairs, "Unsubscribed from channel");

    Ok(())
}

fn with_token(mut subscription: Subscription, token: Option<&RedactedToken>) -> Subscription {
    if let Some(token) = token {
        subscription.token = Some(token.clone());
    }
    subscription
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_token_overrides_subscription_token() {
        let token = RedactedToken::new("session");
        let sub = with_token(Subscription::named("openOrders").with_token("stale"), Some(&token));
        assert_eq!(sub.token.unwrap().expose(), "session");
    }

    #[test]
    fn public_subscription_stays_tokenless() {
        let sub = with_token(Subscription::book(10), None);
        assert!(sub.token.is_none());
    }
}
