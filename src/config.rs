// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::PgPricingStore,
    engine::{EngineSettings, DEFAULT_FALLBACK_TIER},
    services::{OverrideService, PricingService, PricingStore, TierService},
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    // Casas decimais da moeda (IDR = 0)
    pub currency_minor_units: u32,
    pub default_tier_name: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        Ok(Self {
            database_url,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5)?,
            currency_minor_units: parse_or("CURRENCY_MINOR_UNITS", 0)?,
            default_tier_name: env::var("DEFAULT_TIER_NAME")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_TIER.to_string()),
        })
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            minor_units: self.currency_minor_units,
            fallback_tier_name: self.default_tier_name.clone(),
        }
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} inválida: {raw}")),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: AppConfig,
    pub i18n_store: I18nStore,
    pub pricing_service: PricingService,
    pub tier_service: TierService,
    pub override_service: OverrideService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let store: Arc<dyn PricingStore> = Arc::new(PgPricingStore::new(db_pool.clone()));
        Ok(Self::with_store(db_pool, config, store))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_store(db_pool: PgPool, config: AppConfig, store: Arc<dyn PricingStore>) -> Self {
        let settings = config.engine_settings();

        Self {
            pricing_service: PricingService::new(store.clone(), settings.clone()),
            tier_service: TierService::new(store.clone(), settings),
            override_service: OverrideService::new(store),
            i18n_store: I18nStore::new(),
            db_pool,
            config,
        }
    }
}

// Permite ao extrator `Locale` negociar o idioma com as mensagens carregadas
impl FromRef<AppState> for I18nStore {
    fn from_ref(state: &AppState) -> Self {
        state.i18n_store.clone()
    }
}
