// src/config.rs

use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::{
    db::{
        AdminRepository, ChatRepository, CooperativeRepository, DeliveryRepository,
        OrderRepository, PestRepository, ProductRepository, SupplierRepository, UserRepository,
        WeatherRepository,
    },
    services::{
        admin_service::AdminService, auth::AuthService, chat_service::ChatService,
        cooperative_service::CooperativeService, order_service::OrderService,
        pest_service::PestService, product_service::ProductService,
        supplier_service::SupplierService, transport_service::TransportService,
        weather_service::WeatherService,
    },
};

/// Segredo usado quando `JWT_SECRET` não está definido. Só serve para desenvolvimento.
pub const FALLBACK_JWT_SECRET: &str = "sistema-agricola-secret-key-2025";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub public_dir: PathBuf,
    pub database_max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Separado de `from_env` para os testes não dependerem do ambiente do processo
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                warn!("⚠️ JWT_SECRET não definido, usando o segredo padrão de desenvolvimento");
                FALLBACK_JWT_SECRET.to_string()
            });

        Ok(Self {
            database_url,
            jwt_secret,
            port: try_load(&lookup, "PORT", "3000")?,
            public_dir: try_load(&lookup, "PUBLIC_DIR", "public")?,
            database_max_connections: try_load(&lookup, "DATABASE_MAX_CONNECTIONS", "5")?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} não definido, usando o padrão: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow::anyhow!("Valor inválido para {key}: {e}"))
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
    pub user_repo: UserRepository,
    pub auth_service: AuthService,
    pub product_service: ProductService,
    pub order_service: OrderService,
    pub transport_service: TransportService,
    pub chat_service: ChatService,
    pub pest_service: PestService,
    pub supplier_service: SupplierService,
    pub cooperative_service: CooperativeService,
    pub admin_service: AdminService,
    pub weather_service: WeatherService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool, config: Config) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let delivery_repo = DeliveryRepository::new(db_pool.clone());
        let supplier_repo = SupplierRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), config.jwt_secret.clone(), db_pool.clone());
        let product_service = ProductService::new(product_repo.clone());
        let order_service = OrderService::new(
            order_repo.clone(),
            product_repo.clone(),
            delivery_repo.clone(),
            user_repo.clone(),
            db_pool.clone(),
        );
        let transport_service = TransportService::new(delivery_repo, order_repo, db_pool.clone());
        let chat_service = ChatService::new(ChatRepository::new(db_pool.clone()));
        let pest_service = PestService::new(PestRepository::new(db_pool.clone()), supplier_repo.clone());
        let supplier_service = SupplierService::new(supplier_repo);
        let cooperative_service =
            CooperativeService::new(CooperativeRepository::new(db_pool.clone()), db_pool.clone());
        let admin_service = AdminService::new(AdminRepository::new(db_pool.clone()), user_repo.clone());
        let weather_service = WeatherService::new(WeatherRepository::new(db_pool.clone()));

        Self {
            db_pool,
            config,
            user_repo,
            auth_service,
            product_service,
            order_service,
            transport_service,
            chat_service,
            pest_service,
            supplier_service,
            cooperative_service,
            admin_service,
            weather_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_fill_everything_but_the_database_url() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/agro")])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.public_dir, PathBuf::from("public"));
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.jwt_secret, FALLBACK_JWT_SECRET);
    }

    #[test]
    fn explicit_values_win() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/agro"),
            ("JWT_SECRET", "segredo"),
            ("PORT", "8080"),
            ("PUBLIC_DIR", "/srv/www"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_secret, "segredo");
        assert_eq!(config.public_dir, PathBuf::from("/srv/www"));
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
    }

    #[test]
    fn invalid_port_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[("DATABASE_URL", "x"), ("PORT", "porta")]));
        assert!(result.is_err());
    }
}
