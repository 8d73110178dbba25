use crate::{
    game::{Evaluation, GridEngine},
    models::{GamePhase, SessionSummary},
    websocket::messages::{ClientMessage, ServerMessage},
    AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, Stream, StreamExt},
};
use rand::Rng;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::mpsc,
    time::{interval, MissedTickBehavior},
};
use uuid::Uuid;

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("websocket closed: {0}")]
    Socket(#[from] axum::Error),
    #[error("outbound channel closed")]
    ChannelClosed,
}

/// WebSocket upgrade handler
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4();
    let (sender, receiver) = socket.split();
    let (tx, rx) = mpsc::channel::<ServerMessage>(100);

    state
        .sessions
        .insert(session_id, SessionSummary::new(session_id));
    tracing::info!("Game session {} connected", session_id);

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(forward_messages(sender, rx));

    let recv_state = state.clone();
    let mut recv_task =
        tokio::spawn(async move { run_session(session_id, receiver, &recv_state, tx).await });

    // Wait for either task to finish
    tokio::select! {
        result = (&mut send_task) => {
            recv_task.abort();
            if let Ok(Err(e)) = result {
                tracing::warn!("Session {} send loop ended: {}", session_id, e);
            }
        }
        result = (&mut recv_task) => {
            send_task.abort();
            if let Ok(Err(e)) = result {
                tracing::warn!("Session {} receive loop ended: {}", session_id, e);
            }
        }
    }

    state.sessions.remove(&session_id);
    tracing::info!("Game session {} closed", session_id);
}

async fn forward_messages(
    mut sender: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<ServerMessage>,
) -> Result<(), SessionError> {
    while let Some(msg) = rx.recv().await {
        let json = serde_json::to_string(&msg)?;
        sender.send(Message::Text(json.into())).await?;
    }
    Ok(())
}

async fn run_session(
    session_id: Uuid,
    receiver: SplitStream<WebSocket>,
    state: &AppState,
    tx: mpsc::Sender<ServerMessage>,
) -> Result<(), SessionError> {
    let mut engine = GridEngine::from_os_rng(state.config.game);
    engine.set_high_score(state.high_score());

    drive_session(session_id, &mut engine, receiver, &tx, |engine| {
        state.record_session(session_id, engine)
    })
    .await
}

/// Drive one engine from incoming frames and the one-second clock.
///
/// The engine lives on this task alone; the clock is only polled while the
/// engine is in an unpaused time-mode round, and restarts with a full second
/// whenever it starts running again.
async fn drive_session<R, S>(
    session_id: Uuid,
    engine: &mut GridEngine<R>,
    mut incoming: S,
    tx: &mpsc::Sender<ServerMessage>,
    mut on_update: impl FnMut(&GridEngine<R>),
) -> Result<(), SessionError>
where
    R: Rng,
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let mut clock = interval(TICK_PERIOD);
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);

    send_all(tx, vec![snapshot_message(engine)]).await?;

    loop {
        let was_running = engine.timer_running();

        let replies = tokio::select! {
            frame = incoming.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => apply_text(engine, &text),
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("Client disconnected from session {}", session_id);
                        return Ok(());
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                }
            }
            _ = clock.tick(), if was_running => apply_tick(engine),
        };

        if !was_running && engine.timer_running() {
            clock.reset();
        }

        on_update(engine);
        send_all(tx, replies).await?;
    }
}

async fn send_all(
    tx: &mpsc::Sender<ServerMessage>,
    messages: Vec<ServerMessage>,
) -> Result<(), SessionError> {
    for msg in messages {
        tx.send(msg).await.map_err(|_| SessionError::ChannelClosed)?;
    }
    Ok(())
}

fn snapshot_message<R: Rng>(engine: &GridEngine<R>) -> ServerMessage {
    ServerMessage::GameState {
        snapshot: engine.snapshot(),
    }
}

/// Parse one text frame and apply it. Malformed input gets an error reply
/// and leaves the engine untouched.
pub fn apply_text<R: Rng>(engine: &mut GridEngine<R>, text: &str) -> Vec<ServerMessage> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(client_msg) => {
            tracing::debug!("Received {:?}", client_msg);
            apply_client_message(engine, client_msg)
        }
        Err(e) => {
            tracing::error!("Failed to parse message: {}", e);
            vec![ServerMessage::Error {
                message: format!("Invalid message format: {}", e),
            }]
        }
    }
}

/// Apply one client message and collect the replies, ending with a snapshot
pub fn apply_client_message<R: Rng>(
    engine: &mut GridEngine<R>,
    msg: ClientMessage,
) -> Vec<ServerMessage> {
    let phase_before = engine.phase();
    let mut replies = Vec::new();

    match msg {
        ClientMessage::StartGame { mode } => engine.start_game(mode),
        ClientMessage::ToggleTile { tile_id } => {
            if engine.toggle_selection(tile_id) {
                match engine.evaluate_selection() {
                    Evaluation::Matched(outcome) => {
                        replies.push(ServerMessage::MatchCleared {
                            tile_ids: outcome.cleared,
                            points: outcome.points,
                            score: engine.score(),
                            level: engine.level(),
                        });
                        replies.extend(outcome.row_inserted.map(ServerMessage::from));
                    }
                    Evaluation::Rejected { sum } => {
                        replies.push(ServerMessage::SelectionRejected {
                            sum,
                            target: engine.target(),
                        });
                    }
                    Evaluation::Pending { .. } | Evaluation::Idle => {}
                }
            }
        }
        ClientMessage::SetPaused { paused } => {
            engine.set_paused(paused);
        }
        ClientMessage::Restart => engine.restart(),
        ClientMessage::ReturnToMenu => engine.return_to_menu(),
        ClientMessage::RequestState => {}
    }

    finish_replies(engine, phase_before, replies)
}

/// Advance the round clock by one second and collect the replies
pub fn apply_tick<R: Rng>(engine: &mut GridEngine<R>) -> Vec<ServerMessage> {
    let phase_before = engine.phase();
    let replies = engine
        .tick()
        .map(ServerMessage::from)
        .into_iter()
        .collect();
    finish_replies(engine, phase_before, replies)
}

fn finish_replies<R: Rng>(
    engine: &GridEngine<R>,
    phase_before: GamePhase,
    mut replies: Vec<ServerMessage>,
) -> Vec<ServerMessage> {
    if phase_before != GamePhase::GameOver && engine.phase() == GamePhase::GameOver {
        replies.push(ServerMessage::GameOver {
            score: engine.score(),
            high_score: engine.high_score(),
        });
    }
    replies.push(snapshot_message(engine));
    replies
}
