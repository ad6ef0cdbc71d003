//! Server construction and wiring.
//!
//! `build_core` is the composition root: it assembles the in-process
//! adapters, the presence hub, and the domain services behind their
//! driving ports. `run` serves the live channel and health probes; the
//! synchronous operation surface is exposed to the embedding CRUD layer
//! through the [`CoreServices`] handle.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::{web, App, HttpServer};

use crate::domain::ports::{
    LiveDelivery, MembershipCommand, MessagingCommand, NotificationQuery, ReputationCommand,
    TeammateQuery,
};
use crate::domain::{
    MatchingService, MembershipService, MessagingService, NotificationService, ReputationService,
};
use crate::inbound::http::health::{liveness, readiness, HealthState};
use crate::inbound::ws::state::WsState;
use crate::inbound::ws::ws_entry;
use crate::live::PresenceHub;
use crate::outbound::identity::SharedTokenVerifier;
use crate::outbound::persistence::{
    CollaborationStore, MemoryCandidateDirectory, MemoryMessageRepository,
    MemoryNotificationRepository, MemoryProjectRepository, MemoryReputationRepository,
};

/// Everything the embedding layer needs: the driving ports, the hub, and
/// the shared store plus verifier it seeds with profiles and sessions.
#[derive(Clone)]
pub struct CoreServices {
    pub store: CollaborationStore,
    pub verifier: Arc<SharedTokenVerifier>,
    pub hub: Arc<PresenceHub>,
    pub membership: Arc<dyn MembershipCommand>,
    pub reputation: Arc<dyn ReputationCommand>,
    pub teammates: Arc<dyn TeammateQuery>,
    pub messaging: Arc<dyn MessagingCommand>,
    pub notifications: Arc<dyn NotificationQuery>,
}

/// Assemble the core over the in-process adapters.
#[must_use]
pub fn build_core() -> CoreServices {
    let store = CollaborationStore::new();
    let verifier = Arc::new(SharedTokenVerifier::new());

    let notification_repo = Arc::new(MemoryNotificationRepository::new(store.clone()));
    let hub = Arc::new(PresenceHub::new(
        verifier.clone(),
        notification_repo.clone(),
    ));
    let live: Arc<dyn LiveDelivery> = hub.clone();

    let membership: Arc<dyn MembershipCommand> = Arc::new(MembershipService::new(
        Arc::new(MemoryProjectRepository::new(store.clone())),
        live.clone(),
    ));
    let reputation: Arc<dyn ReputationCommand> = Arc::new(ReputationService::new(
        Arc::new(MemoryReputationRepository::new(store.clone())),
        live.clone(),
    ));
    let teammates: Arc<dyn TeammateQuery> = Arc::new(MatchingService::new(Arc::new(
        MemoryCandidateDirectory::new(store.clone()),
    )));
    let messaging: Arc<dyn MessagingCommand> = Arc::new(MessagingService::new(
        Arc::new(MemoryMessageRepository::new(store.clone())),
        live,
    ));
    let notifications: Arc<dyn NotificationQuery> =
        Arc::new(NotificationService::new(notification_repo));

    CoreServices {
        store,
        verifier,
        hub,
        membership,
        reputation,
        teammates,
        messaging,
        notifications,
    }
}

/// Serve the live channel and health probes until shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let core = build_core();
    let ws_state = web::Data::new(WsState::new(
        core.hub.clone(),
        core.messaging.clone(),
        config.allowed_origins.clone(),
    ));
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(ws_state.clone())
            .app_data(server_health_state.clone())
            .service(ws_entry)
            .service(readiness)
            .service(liveness)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }
    let server = server.bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
