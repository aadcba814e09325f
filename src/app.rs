/*
 * Responsibility
 * - Load Config, build the signer keyring and the authenticator
 * - Assemble the Router: routes -> authenticator -> http layers
 * - axum::serve() with the peer address available to the authenticator
 */
use std::{net::SocketAddr, panic, process, sync::Arc};

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    error::AppError,
    middleware::{
        self,
        auth::Authenticator,
        http::HttpLimits,
    },
    services::auth::Keyring,
};

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,authn_gate=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting authn-gate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let keyring = build_keyring(&config)?;
    let authenticator = Arc::new(Authenticator::new(
        config.path_policy.clone(),
        Arc::new(keyring),
        Arc::new(config.trusted_proxies.clone()),
        config.own_account.clone(),
    ));
    tracing::debug!(?authenticator, "authenticator ready");

    let app = build_router(authenticator, config.http_limits);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

fn build_keyring(config: &Config) -> Result<Keyring> {
    let keyring = match &config.token_signers_file {
        Some(path) => Keyring::load(
            path,
            config.token_max_age_seconds,
            config.token_clock_leeway_seconds,
        )?,
        None => {
            tracing::warn!("TOKEN_SIGNERS_FILE not set: every credential will be rejected");
            Keyring::new(
                config.token_max_age_seconds,
                config.token_clock_leeway_seconds,
            )
        }
    };
    tracing::info!(signers = keyring.len(), "signer keyring loaded");
    Ok(keyring)
}

/// Full application router. The authenticator sits outside the routes so
/// its policy sees complete paths; the http layers sit outside both.
pub fn build_router(authenticator: Arc<Authenticator>, limits: HttpLimits) -> Router {
    let routes = Router::new()
        .route("/health", get(api::v1::handlers::health::health))
        .nest("/api/v1", api::v1::routes())
        .fallback(|| async { AppError::not_found("route") });

    let app = middleware::auth::apply(routes, authenticator);
    middleware::http::apply(app, limits)
}

