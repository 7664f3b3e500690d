use crate::game::engine::{Game, GameConfig};
use crate::game::session::{run_session, LatestFrame, SessionStats};
use crate::protocol::{self, ClientMessage};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn handle_socket(socket: WebSocket, config: GameConfig, stats: Arc<SessionStats>) {
    let (mut sender, mut receiver) = socket.split();
    let outbound = Arc::new(LatestFrame::new());
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<ClientMessage>();

    let game_task = tokio::spawn(run_session(
        Game::new(config),
        inbound_rx,
        Arc::clone(&outbound),
        stats,
    ));

    let send_task = tokio::spawn(async move {
        loop {
            outbound.wait_for_update().await;
            let Some(frame) = outbound.take_latest() else { continue };
            let payload = match protocol::encode_state(&frame.snapshot, &frame.events) {
                Ok(payload) => payload,
                Err(error) => {
                    tracing::warn!(?error, "failed to encode state frame");
                    continue;
                }
            };
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        let Ok(message) = result else { break };
        match message {
            Message::Text(text) => {
                let Some(message) = protocol::decode_client_message(&text) else { continue };
                if inbound_tx.send(message).is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    drop(inbound_tx);
    if let Err(error) = game_task.await {
        tracing::warn!(?error, "game task ended abnormally");
    }
    send_task.abort();
}
