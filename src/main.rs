//! Mindful server entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mindful::adapters::ai::{ChatCompletionsConfig, ChatCompletionsProvider, FailoverGenerator};
use mindful::adapters::http::{app_router, BillingAppState, MeditationAppState, RouterOptions};
use mindful::adapters::postgres::{PostgresMeditationRepository, PostgresSubscriptionStore};
use mindful::adapters::speech::{ElevenLabsConfig, ElevenLabsSynthesizer};
use mindful::adapters::storage::{load_knowledge_base, LocalAudioStorage};
use mindful::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use mindful::application::{
    AudioPipeline, GenerateMeditationHandler, GetSubscriptionHandler, ListMeditationsHandler,
    ListVoicesHandler, SynthesizeVoiceHandler, SyncSubscriptionHandler,
};
use mindful::config::{AiConfig, AppConfig, DatabaseConfig, ServerConfig};
use mindful::domain::billing::StripeWebhookVerifier;
use mindful::domain::meditation::PromptBuilder;
use mindful::ports::{MeditationRepository, ScriptGenerator, SpeechSynthesizer, SubscriptionStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let pool = match &config.database {
        Some(database) => Some(connect_database(database).await?),
        None => {
            warn!("No database configured; webhooks and history are disabled");
            None
        }
    };

    let billing = billing_state(&config, pool.as_ref());
    let meditation = meditation_state(&config, pool.as_ref()).await?;

    let options = RouterOptions {
        audio_dir: config
            .features
            .generate_audio
            .then(|| config.storage.audio_dir.clone()),
        request_timeout: config.server.request_timeout(),
    };
    let app = app_router(billing, meditation, options);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "Mindful listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn connect_database(config: &DatabaseConfig) -> Result<PgPool, BoxError> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await?;
    info!(host = config.host(), "Connected to PostgreSQL");

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations applied");
    }

    Ok(pool)
}

fn billing_state(config: &AppConfig, pool: Option<&PgPool>) -> BillingAppState {
    let Some(pool) = pool else {
        return BillingAppState::default();
    };

    let store: Arc<dyn SubscriptionStore> =
        Arc::new(PostgresSubscriptionStore::new(pool.clone()));
    let payment = &config.payment;
    let provider = Arc::new(StripePaymentAdapter::new(
        StripeConfig::new(payment.stripe_api_key.clone())
            .with_base_url(payment.api_base_url.clone())
            .with_timeout(payment.timeout()),
    ));
    let verifier = StripeWebhookVerifier::new(payment.stripe_webhook_secret.clone())
        .with_tolerance_secs(payment.signature_tolerance_secs);

    BillingAppState {
        sync_handler: Some(Arc::new(SyncSubscriptionHandler::new(
            verifier,
            store.clone(),
            provider,
        ))),
        subscription_handler: Some(Arc::new(GetSubscriptionHandler::new(store))),
    }
}

async fn meditation_state(
    config: &AppConfig,
    pool: Option<&PgPool>,
) -> Result<MeditationAppState, BoxError> {
    let generator = script_generator(&config.ai)?;

    let mut prompts =
        PromptBuilder::default().with_sampling(config.ai.temperature, config.ai.max_tokens);
    if let Some(dir) = &config.ai.knowledge_dir {
        match load_knowledge_base(dir).await {
            Ok(knowledge) => prompts = prompts.with_guidance(knowledge),
            Err(e) => warn!(
                error = %e,
                dir = %dir.display(),
                "Knowledge base unreadable; using built-in prompt"
            ),
        }
    }

    let synthesizer: Option<Arc<dyn SpeechSynthesizer>> = config
        .voice
        .elevenlabs_api_key
        .as_ref()
        .filter(|_| config.voice.is_configured())
        .map(|key| {
            Arc::new(ElevenLabsSynthesizer::new(
                ElevenLabsConfig::new(key.clone())
                    .with_model(config.voice.model_id.clone())
                    .with_base_url(config.voice.base_url.clone())
                    .with_timeout(config.voice.timeout()),
            )) as Arc<dyn SpeechSynthesizer>
        });
    if synthesizer.is_none() {
        warn!("No ElevenLabs key configured; voice endpoints are disabled");
    }

    let repository: Option<Arc<dyn MeditationRepository>> = pool.map(|pool| {
        Arc::new(PostgresMeditationRepository::new(pool.clone())) as Arc<dyn MeditationRepository>
    });

    let mut generate = GenerateMeditationHandler::new(generator, prompts);
    if config.features.generate_audio {
        match &synthesizer {
            Some(synthesizer) => {
                generate = generate.with_audio(AudioPipeline {
                    synthesizer: synthesizer.clone(),
                    storage: Arc::new(LocalAudioStorage::new(
                        config.storage.audio_dir.clone(),
                        config.storage.public_base_url.clone(),
                    )),
                });
            }
            None => warn!("Audio generation enabled without a speech provider; scripts only"),
        }
    }
    if let Some(repository) = &repository {
        generate = generate.with_repository(repository.clone());
    }

    Ok(MeditationAppState {
        generate_handler: Arc::new(generate),
        voice_handler: synthesizer
            .clone()
            .map(|s| Arc::new(SynthesizeVoiceHandler::new(s))),
        list_voices_handler: Arc::new(ListVoicesHandler::new(synthesizer)),
        history_handler: repository.map(|r| Arc::new(ListMeditationsHandler::new(r))),
    })
}

/// Kimi first, DeepSeek as fallback; either alone is enough.
fn script_generator(config: &AiConfig) -> Result<Arc<dyn ScriptGenerator>, BoxError> {
    let mut providers: Vec<Arc<dyn ScriptGenerator>> = Vec::new();

    if let Some(key) = config.kimi_api_key.as_ref().filter(|_| config.has_kimi()) {
        providers.push(Arc::new(ChatCompletionsProvider::new(
            ChatCompletionsConfig::kimi(key.clone())
                .with_model(config.kimi_model.clone())
                .with_base_url(config.kimi_base_url.clone())
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries),
        )));
    }
    if let Some(key) = config.deepseek_api_key.as_ref().filter(|_| config.has_deepseek()) {
        providers.push(Arc::new(ChatCompletionsProvider::new(
            ChatCompletionsConfig::deepseek(key.clone())
                .with_model(config.deepseek_model.clone())
                .with_base_url(config.deepseek_base_url.clone())
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries),
        )));
    }

    let mut providers = providers.into_iter();
    let primary = providers.next().ok_or("No AI provider configured")?;
    let failover = providers.fold(FailoverGenerator::new(primary), |f, p| f.with_fallback(p));
    Ok(Arc::new(failover))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => warn!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
