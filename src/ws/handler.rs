//! WebSocket handler for game client connections

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::OUTBOUND_CAPACITY;
use crate::game::session::{GameSession, SessionCommand};
use crate::mint;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::{AppState, SessionInfo};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();

    state.sessions.insert(connection_id, SessionInfo::new());
    info!(%connection_id, active = state.session_count(), "client connected");

    let (mut sender, mut receiver) = socket.split();

    // Outbound feed shared by the game session, mint attempts, and wallet
    // replies
    let (out_tx, mut out_rx) = mpsc::channel::<ServerMessage>(OUTBOUND_CAPACITY);

    // Dropping this sender ends the game session task
    let commands = GameSession::spawn(connection_id, state.store.clone(), out_tx.clone());

    // Task to push outbound messages to this client
    let send_task = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            if sender
                .send(Message::Text(msg.to_json().into()))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    // Task to receive messages from this client
    let recv_task = {
        let state = state.clone();

        tokio::spawn(async move {
            while let Some(result) = receiver.next().await {
                match result {
                    Ok(Message::Text(text)) => {
                        let Some(msg) = ClientMessage::parse(&text) else {
                            debug!(%connection_id, input = %text, "unrecognized command");
                            continue;
                        };
                        dispatch(msg, &state, &commands, &out_tx, connection_id).await;
                    }
                    Ok(Message::Close(_)) => {
                        info!(%connection_id, "client sent close frame");
                        break;
                    }
                    Ok(_) => {
                        // Ignore binary, ping, pong frames
                    }
                    Err(e) => {
                        error!(%connection_id, error = %e, "websocket error");
                        break;
                    }
                }
            }
        })
    };

    // Wait for either task to finish
    tokio::select! {
        _ = send_task => {}
        _ = recv_task => {}
    }

    state.sessions.remove(&connection_id);
    info!(%connection_id, active = state.session_count(), "client disconnected");
}

/// Route one parsed client command
async fn dispatch(
    msg: ClientMessage,
    state: &Arc<AppState>,
    commands: &mpsc::Sender<SessionCommand>,
    out_tx: &mpsc::Sender<ServerMessage>,
    connection_id: Uuid,
) {
    match msg {
        ClientMessage::Start => {
            let _ = commands.send(SessionCommand::Start).await;
        }
        ClientMessage::Direction(direction) => {
            let _ = commands.send(SessionCommand::Steer(direction)).await;
        }
        ClientMessage::Connect => {
            let reply = match state.wallet.connect().await {
                Ok(account) => ServerMessage::Wallet {
                    account: Some(account),
                },
                Err(e) => {
                    warn!(%connection_id, error = %e, "wallet connect failed");
                    ServerMessage::Notice {
                        message: "No wallet available. Please install a wallet extension."
                            .to_string(),
                    }
                }
            };
            let _ = out_tx.send(reply).await;
        }
        ClientMessage::Redeem(code) => {
            let store = state.store.clone();
            let wallet = state.wallet.clone();
            let out = out_tx.clone();
            tokio::spawn(async move {
                mint::redeem(&store, &wallet, &code, &out).await;
            });
        }
        ClientMessage::Ping => {
            debug!(%connection_id, "ping");
        }
    }
}
