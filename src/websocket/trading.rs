//! Order management requests on the private stream.
//!
//! Every request is sent with the session token, replacing any token
//! already set on it. Acknowledgements arrive as
//! [`Message::AddOrderStatus`](crate::Message::AddOrderStatus) and its
//! cancel counterparts, or as [`Message::Error`](crate::Message::Error).

use tracing::info;

use super::{WsWriter, send};
use crate::Result;
use crate::models::{AddOrder, CancelAll, CancelOrder, RedactedToken};

/// Sends an `addOrder` request.
///
/// # Errors
///
/// Returns a [`FeedError`](crate::FeedError) if sending the request fails.
pub async fn add_order(
    write: &mut WsWriter,
    mut request: AddOrder,
    token: &RedactedToken,
    verbose: bool,
) -> Result<()> {
    request.token = Some(token.clone());
    send(write, &request, verbose).await?;
    info!(
        event = "addOrder",
        pair = %request.pair,
        side = ?request.side,
        reqid = ?request.reqid,
        "Sent addOrder request"
    );

    Ok(())
}

/// Sends a `cancelOrder` request.
///
/// # Errors
///
/// Returns a [`FeedError`](crate::FeedError) if sending the request fails.
pub async fn cancel_order(
    write: &mut WsWriter,
    mut request: CancelOrder,
    token: &RedactedToken,
    verbose: bool,
) -> Result<()> {
    request.token = Some(token.clone());
    send(write, &request, verbose).await?;
    info!(
        event = "cancelOrder",
        txids = ?request.txid,
        reqid = ?request.reqid,
        "Sent cancelOrder request"
    );

    Ok(())
}

/// Sends a `cancelAll` request.
///
/// # Errors
///
/// Returns a [`FeedError`](crate::FeedError) if sending the request fails.
pub async fn cancel_all(
    write: &mut WsWriter,
    mut request: CancelAll,
    token: &RedactedToken,
    verbose: bool,
) -> Result<()> {
    request.token = Some(token.clone());
    send(write, &request, verbose).await?;
    info!(event = "cancelAll", reqid = ?request.reqid, "Sent cancelAll request");

    Ok(())
}
