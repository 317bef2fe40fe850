//! WebSocket handler for live encounter watching
//!
//! Clients subscribe to the encounters they are viewing and receive
//! invalidation pushes when something changes. A push carries no payload
//! beyond the encounter id and topic; the client re-fetches over REST.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, RwLock};

use crate::application::ports::outbound::ChangeTopic;
use crate::domain::value_objects::EncounterId;
use crate::infrastructure::state::AppState;

/// Unique identifier for a connected client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(uuid::Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Messages from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Start receiving change pushes for an encounter
    Watch { encounter_id: String },
    /// Stop receiving change pushes for an encounter
    Unwatch { encounter_id: String },
    /// Heartbeat ping
    Heartbeat,
}

/// Messages from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Watch confirmed
    Watching { encounter_id: String },
    /// Unwatch confirmed
    Unwatched { encounter_id: String },
    /// The encounter record changed; re-fetch it
    EncounterChanged { encounter_id: String },
    /// The combatant roster changed; re-fetch it
    CombatantsChanged { encounter_id: String },
    /// Error message
    Error { code: String, message: String },
    /// Heartbeat response
    Pong,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let client_id = ClientId::new();
    let watched: Arc<RwLock<HashSet<EncounterId>>> = Arc::new(RwLock::new(HashSet::new()));

    // Channel for sending messages to this client
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    tracing::info!("New WebSocket connection established: {}", client_id);

    // Forward messages from the channel to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Relay change notifications for watched encounters
    let notify_task = {
        let mut notifications = state.broadcaster.subscribe();
        let watched = watched.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            loop {
                match notifications.recv().await {
                    Ok(notification) => {
                        if !watched.read().await.contains(&notification.encounter_id) {
                            continue;
                        }
                        let encounter_id = notification.encounter_id.to_string();
                        let msg = match notification.topic {
                            ChangeTopic::Encounter => ServerMessage::EncounterChanged {
                                encounter_id,
                            },
                            ChangeTopic::Combatants => ServerMessage::CombatantsChanged {
                                encounter_id,
                            },
                        };
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                    // Lagged: older signals were dropped; the next one
                    // still triggers a re-fetch, so just keep receiving.
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "Client {} lagged {} change notifications",
                            client_id,
                            skipped
                        );
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    };

    // Handle incoming messages
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => {
                    if let Some(response) = handle_message(msg, &watched, client_id).await {
                        if tx.send(response).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to parse message: {}", e);
                    let error = ServerMessage::Error {
                        code: "PARSE_ERROR".to_string(),
                        message: format!("Invalid message format: {}", e),
                    };
                    if tx.send(error).is_err() {
                        break;
                    }
                }
            },
            Ok(Message::Close(_)) => {
                tracing::info!("WebSocket connection closed by client: {}", client_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                let _ = tx.send(ServerMessage::Pong);
            }
            Err(e) => {
                tracing::error!("WebSocket error for client {}: {}", client_id, e);
                break;
            }
            _ => {}
        }
    }

    send_task.abort();
    notify_task.abort();
    tracing::info!("WebSocket connection terminated: {}", client_id);
}

async fn handle_message(
    msg: ClientMessage,
    watched: &RwLock<HashSet<EncounterId>>,
    client_id: ClientId,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Watch { encounter_id } => match encounter_id.parse::<EncounterId>() {
            Ok(id) => {
                watched.write().await.insert(id);
                tracing::debug!("Client {} watching encounter {}", client_id, id);
                Some(ServerMessage::Watching {
                    encounter_id: id.to_string(),
                })
            }
            Err(_) => Some(ServerMessage::Error {
                code: "INVALID_ENCOUNTER_ID".to_string(),
                message: format!("'{}' is not a valid encounter id", encounter_id),
            }),
        },
        ClientMessage::Unwatch { encounter_id } => match encounter_id.parse::<EncounterId>() {
            Ok(id) => {
                watched.write().await.remove(&id);
                Some(ServerMessage::Unwatched {
                    encounter_id: id.to_string(),
                })
            }
            Err(_) => Some(ServerMessage::Error {
                code: "INVALID_ENCOUNTER_ID".to_string(),
                message: format!("'{}' is not a valid encounter id", encounter_id),
            }),
        },
        ClientMessage::Heartbeat => Some(ServerMessage::Pong),
    }
}
