use pagechat_ai::OpenAiBackend;
use pagechat_conversation::{ContextStore, InMemoryContextStore};
use pagechat_messenger::{GraphSendApi, SignatureVerifier};
use pagechat_responder::{LlmResponder, ResponderKind, ResponseGenerator, RuleResponder};
use pagechat_server::{
    app::{AppState, router},
    config::ServerConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; variables may come from the environment.
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env().expect("failed to load configuration");

    let default_filter = if config.debug {
        "debug"
    } else {
        "info,tower_http=debug"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(?config, "Loaded configuration");

    let store: Arc<dyn ContextStore> = Arc::new(InMemoryContextStore::new());

    let responder: Arc<dyn ResponseGenerator> = match config.responder {
        ResponderKind::Rules => Arc::new(RuleResponder::new(store)),
        ResponderKind::Llm => {
            let backend =
                OpenAiBackend::new(config.openai_config()).expect("failed to build model client");
            Arc::new(LlmResponder::new(store, Arc::new(backend)))
        }
    };
    tracing::info!(responder = ?config.responder, "Response generator ready");

    let sender = GraphSendApi::new(config.send_config()).expect("failed to build Send API client");

    let state = AppState::new(
        config.verify_token.clone(),
        config.app_name.clone(),
        SignatureVerifier::new(config.app_secret.clone()),
        responder,
        Arc::new(sender),
    );
    let app = router(Arc::new(state));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
