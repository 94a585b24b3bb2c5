use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::sse::{Handshake, ServerEvent},
    error::ServiceError,
    state::{SharedState, SseHub},
};

const EVENT_HANDSHAKE: &str = "handshake";

/// Subscribe to the stream of an existing season.
pub async fn subscribe_season(
    state: &SharedState,
    season_id: Uuid,
) -> Result<broadcast::Receiver<ServerEvent>, ServiceError> {
    state.load_season(season_id).await?;
    Ok(state.season_sse(season_id).subscribe())
}

/// Convert a broadcast receiver into an SSE response, forwarding events until
/// the client disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
    season_id: Uuid,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            let mut event = Event::default().data(payload.data);
                            if let Some(name) = payload.event {
                                event = event.event(name);
                            }

                            if tx.send(Ok(event)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(season_id = %season_id, skipped, "season SSE subscriber lagged");
                            continue;
                        }
                    }
                }
            }
        }

        info!(season_id = %season_id, "season SSE stream disconnected");
    });

    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Greet the subscribers of a season hub.
pub fn broadcast_handshake(hub: &SseHub, season_id: Uuid, degraded: bool) {
    let payload = Handshake {
        season_id,
        message: "season stream connected".to_string(),
        degraded,
    };
    match ServerEvent::json(Some(EVENT_HANDSHAKE.to_string()), &payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(error = %err, "failed to serialize SSE handshake"),
    }
}
