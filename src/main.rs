//src/main.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tourism_pricing::{
    config::{AppConfig, AppState},
    docs::ApiDoc,
    handlers,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; padrão: info
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::new(config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let tier_routes = Router::new()
        .route("/"
               ,get(handlers::tiers::list_tiers)
               .post(handlers::tiers::create_tier)
        )
        .route("/{id}"
               ,put(handlers::tiers::update_tier)
        )
        .route("/{id}/deactivate"
               ,post(handlers::tiers::deactivate_tier)
        );

    let vendor_routes = Router::new()
        .route("/{vendor_id}/tier"
               ,get(handlers::vendors::get_vendor_tier)
        )
        .route("/{vendor_id}/manual-tier"
               ,put(handlers::vendors::assign_manual_tier)
               .delete(handlers::vendors::clear_manual_tier)
        )
        .route("/{vendor_id}/metrics"
               ,put(handlers::vendors::update_metrics)
        );

    let pricing_routes = Router::new()
        .route("/services/{service_id}/overrides"
               ,get(handlers::overrides::list_overrides)
               .post(handlers::overrides::create_override)
        )
        .route("/overrides/{id}/disable"
               ,post(handlers::overrides::disable_override)
        )
        .route("/quote", post(handlers::pricing::quote))
        .route("/maintenance/expired-tiers", post(handlers::pricing::sweep_expired_tiers))
        .nest("/tiers", tier_routes)
        .nest("/vendors", vendor_routes);

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(handlers::pricing::health))
        .route("/api/bookings/{booking_id}/commission", post(handlers::pricing::price_booking))
        .nest("/api/pricing", pricing_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
