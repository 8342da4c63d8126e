use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing::info;
use vecqa_embeddings::OpenAiEmbedding;
use vecqa_llm::OpenAiChatClient;
use vecqa_pinecone::PineconeVectorStore;
use vecqa_rag::QueryPipeline;
use vecqa_server::config::Environment;
use vecqa_server::telemetry::init_tracing;
use vecqa_server::{build_router, AppState, BearerAuth, FromEnv, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err).context("failed to read .env");
        }
    }
    init_tracing(Environment::from_env());

    let settings = Settings::from_env().context("invalid configuration")?;
    info!(
        environment = ?settings.environment,
        address = %settings.server.address(),
        index = %settings.pinecone.index_name,
        namespace = %settings.pinecone.namespace,
        "starting vecqa-server"
    );

    let state = bootstrap(&settings).await?;
    let app = build_router(state);

    let listener = TcpListener::bind(settings.server.address())
        .await
        .with_context(|| format!("failed to bind {}", settings.server.address()))?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn bootstrap(settings: &Settings) -> anyhow::Result<AppState> {
    let openai = &settings.openai;
    let pinecone = &settings.pinecone;
    let timeout = settings.query.upstream_timeout;
    let http_timeout = settings.query.http_timeout();

    let embedder = OpenAiEmbedding::with_api_base(
        openai.api_key.expose_secret().as_str(),
        openai.base_url.as_str(),
        openai.embedding_model.as_str(),
        openai.embedding_dimension,
    );
    info!(model = %embedder.model(), dimension = openai.embedding_dimension, "embedding client ready");

    let mut store = PineconeVectorStore::builder()
        .api_key(pinecone.api_key.expose_secret().as_str())
        .control_url(pinecone.control_url.as_str())
        .index_name(pinecone.index_name.as_str())
        .namespace(pinecone.namespace.as_str())
        .dimension(openai.embedding_dimension)
        .metric(pinecone.metric)
        .timeout(http_timeout);
    if let Some(host) = &pinecone.index_host {
        store = store.host(host.as_str()).validate_dimension(true);
    }
    let store = store.build().await.context("failed to connect to pinecone")?;

    let mut pipeline = QueryPipeline::builder(Arc::new(embedder), Arc::new(store))
        .with_max_top_k(settings.query.max_top_k)
        .with_call_timeout(timeout)
        .with_temperature(openai.temperature);

    if openai.answer_generation {
        let chat = OpenAiChatClient::with_base_url(
            openai.api_key.expose_secret().as_str(),
            openai.base_url.as_str(),
        )?
        .with_model(openai.completion_model.as_str())
        .with_timeout(http_timeout)?;
        info!(model = %chat.model(), "completion client ready");
        pipeline = pipeline.with_generator(Arc::new(chat));
    } else {
        info!("answer generation disabled");
    }

    let auth = BearerAuth::new(settings.auth_secret.clone());
    if !auth.is_configured() {
        tracing::warn!("AUTH_API is empty; authenticated routes will reject every request");
    }

    Ok(AppState::new(
        pipeline.build()?,
        auth,
        settings.query.default_top_k,
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
