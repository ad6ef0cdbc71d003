//! Per-connection WebSocket session loop.
//!
//! Keeps WebSocket framing and heartbeats at the edge while deferring
//! application behaviour to the presence hub and the injected domain
//! ports. The loop multiplexes three sources: the heartbeat interval, the
//! client's frames, and the connection's event channel (registered with the
//! hub at authentication time). When the hub displaces this connection
//! after the same user authenticates elsewhere, the event channel closes
//! and the loop shuts the socket down.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::mpsc;
use tokio::time;
use tracing::warn;

use crate::domain::ports::LiveDelivery;
use crate::domain::{Error, LiveEvent, UserId};
use crate::inbound::ws::messages::{ClientMessage, ServerMessage};
use crate::inbound::ws::state::WsState;
use crate::live::{ConnectionHandle, ConnectionId};

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    state: WsState,
    session: Session,
    stream: MessageStream,
) {
    WsSession::new(state).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    Network(Closed),
    AuthRejected,
    /// The hub registered a newer connection for the same user.
    Displaced,
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    state: WsState,
    connection_id: ConnectionId,
    /// Sender half of the event channel; handed to the hub on
    /// authentication so the registry holds the only copy afterwards.
    event_tx: Option<mpsc::UnboundedSender<LiveEvent>>,
    user_id: Option<UserId>,
}

impl WsSession {
    fn new(state: WsState) -> Self {
        Self {
            state,
            connection_id: ConnectionId::new(),
            event_tx: None,
            user_id: None,
        }
    }

    async fn run(&mut self, mut session: Session, mut stream: MessageStream) {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        self.event_tx = Some(event_tx);

        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        let error = loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                frame = stream.recv() => {
                    self.handle_stream_frame(&mut session, &mut last_heartbeat, frame).await
                }
                event = event_rx.recv() => {
                    self.handle_live_event(&mut session, event).await
                }
            };

            if let Err(error) = result {
                break error;
            }
        };

        if let Some(user_id) = self.user_id {
            // Guarded by the connection id: if a newer connection displaced
            // this one, the registry entry is left untouched and no
            // offline presence is broadcast.
            self.state.hub.disconnect(user_id, self.connection_id).await;
        }

        self.log_shutdown_reason(&error);
        self.close_session_if_needed(session, Self::close_action_for(&error))
            .await;
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_frame(
        &mut self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        frame: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(frame) = frame else {
            return Err(SessionError::StreamClosed);
        };

        match frame {
            Ok(Message::Ping(payload)) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)?;
                Ok(())
            }
            Ok(Message::Text(text)) => {
                *last_heartbeat = Instant::now();
                self.handle_text_frame(session, text.as_ref()).await
            }
            Ok(Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop) => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Ok(Message::Close(reason)) => Err(SessionError::ClientClosed(reason)),
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_live_event(
        &self,
        session: &mut Session,
        event: Option<LiveEvent>,
    ) -> Result<(), SessionError> {
        match event {
            Some(event) => self
                .send_frame(session, &ServerMessage::from(event))
                .await
                .map_err(SessionError::Network),
            // All senders gone: the hub dropped this connection's handle in
            // favour of a newer one.
            None => Err(SessionError::Displaced),
        }
    }

    async fn handle_text_frame(
        &mut self,
        session: &mut Session,
        text: &str,
    ) -> Result<(), SessionError> {
        let frame = match serde_json::from_str::<ClientMessage>(text) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(error = %error, "rejected malformed WebSocket payload");
                let reply = ServerMessage::from(&Error::validation("malformed payload"));
                return self
                    .send_frame(session, &reply)
                    .await
                    .map_err(SessionError::Network);
            }
        };

        match frame {
            ClientMessage::Authenticate { token } => {
                self.handle_authenticate(session, &token).await
            }
            ClientMessage::SendMessage {
                receiver_id,
                content,
            } => {
                self.handle_send_message(session, receiver_id, content)
                    .await
            }
            ClientMessage::MarkAsRead { message_id } => {
                let Some(reader_id) = self.require_auth(session).await? else {
                    return Ok(());
                };
                if let Err(error) = self.state.messaging.mark_read(message_id, reader_id).await
                {
                    return self.send_domain_error(session, &error).await;
                }
                Ok(())
            }
            ClientMessage::Typing { receiver_id } => {
                self.forward_typing(session, receiver_id, true).await
            }
            ClientMessage::StopTyping { receiver_id } => {
                self.forward_typing(session, receiver_id, false).await
            }
            ClientMessage::IsOnline { user_id } => {
                let is_online = self.state.hub.is_online(user_id).await;
                self.send_frame(
                    session,
                    &ServerMessage::OnlineStatus { user_id, is_online },
                )
                .await
                .map_err(SessionError::Network)
            }
        }
    }

    async fn handle_authenticate(
        &mut self,
        session: &mut Session,
        token: &str,
    ) -> Result<(), SessionError> {
        if self.user_id.is_some() {
            let reply = ServerMessage::from(&Error::conflict("already authenticated"));
            return self
                .send_frame(session, &reply)
                .await
                .map_err(SessionError::Network);
        }
        let Some(event_tx) = self.event_tx.take() else {
            let reply = ServerMessage::from(&Error::conflict("already authenticated"));
            return self
                .send_frame(session, &reply)
                .await
                .map_err(SessionError::Network);
        };

        let handle = ConnectionHandle::new(self.connection_id, event_tx);
        match self.state.hub.authenticate(handle, token).await {
            Ok(user_id) => {
                self.user_id = Some(user_id);
                self.send_frame(session, &ServerMessage::Authenticated { user_id })
                    .await
                    .map_err(SessionError::Network)
            }
            Err(error) => {
                // A failed authentication terminates the connection.
                let reply = ServerMessage::from(&error);
                if let Err(closed) = self.send_frame(session, &reply).await {
                    return Err(SessionError::Network(closed));
                }
                Err(SessionError::AuthRejected)
            }
        }
    }

    async fn handle_send_message(
        &self,
        session: &mut Session,
        receiver_id: UserId,
        content: String,
    ) -> Result<(), SessionError> {
        let Some(sender_id) = self.require_auth(session).await? else {
            return Ok(());
        };

        match self
            .state
            .messaging
            .send_message(sender_id, receiver_id, content)
            .await
        {
            Ok(message) => self
                .send_frame(
                    session,
                    &ServerMessage::MessageSent {
                        message: message.into(),
                    },
                )
                .await
                .map_err(SessionError::Network),
            Err(error) => self.send_domain_error(session, &error).await,
        }
    }

    async fn forward_typing(
        &self,
        session: &mut Session,
        receiver_id: UserId,
        is_typing: bool,
    ) -> Result<(), SessionError> {
        let Some(user_id) = self.require_auth(session).await? else {
            return Ok(());
        };

        // Best-effort, no acknowledgement: a missing receiver drops it.
        self.state
            .hub
            .deliver(receiver_id, LiveEvent::UserTyping { user_id, is_typing })
            .await;
        Ok(())
    }

    /// Resolve the authenticated user or tell the client to authenticate
    /// first. `Ok(None)` means the error frame was sent and the current
    /// command should be dropped without closing the connection.
    async fn require_auth(
        &self,
        session: &mut Session,
    ) -> Result<Option<UserId>, SessionError> {
        if let Some(user_id) = self.user_id {
            return Ok(Some(user_id));
        }
        let reply = ServerMessage::from(&Error::auth("authenticate first"));
        self.send_frame(session, &reply)
            .await
            .map_err(SessionError::Network)?;
        Ok(None)
    }

    async fn send_domain_error(
        &self,
        session: &mut Session,
        error: &Error,
    ) -> Result<(), SessionError> {
        self.send_frame(session, &ServerMessage::from(error))
            .await
            .map_err(SessionError::Network)
    }

    async fn send_frame(
        &self,
        session: &mut Session,
        frame: &ServerMessage,
    ) -> Result<(), Closed> {
        match serde_json::to_string(frame) {
            Ok(body) => session.text(body).await,
            Err(error) => {
                warn!(error = %error, "failed to serialise WebSocket payload");
                Ok(())
            }
        }
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!("WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::AuthRejected
            | SessionError::Displaced
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed => {}
        }
    }

    fn close_action_for(error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::AuthRejected => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Policy,
                description: Some("authentication failed".to_owned()),
            })),
            SessionError::Displaced => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("session replaced".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(&self, session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "failed to close WebSocket session");
            }
        }
    }
}
