//! Application configuration.

use std::path::PathBuf;

use clap::Args;

/// Full application configuration, parsed from CLI flags and environment.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Cart storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Carrier rate-quote API settings.
    #[command(flatten)]
    pub carrier: CarrierConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Durable local cart storage settings.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Path of the JSON document the cart is persisted to.
    #[arg(long, env = "CART_STORAGE_PATH", default_value = "cart.json")]
    pub cart_path: PathBuf,
}

/// Carrier rate-quote API settings.
#[derive(Debug, Args)]
pub struct CarrierConfig {
    /// Base URL of the carrier rate-quote API.
    #[arg(
        long,
        env = "CARRIER_API_URL",
        default_value = "https://sandbox.melhorenvio.com.br"
    )]
    pub base_url: String,

    /// Bearer token for the carrier API. Quotes fail without it; local
    /// flat-rate destinations never need it.
    #[arg(long, env = "CARRIER_API_TOKEN")]
    pub token: Option<String>,

    /// Carrier service to request quotes for.
    #[arg(long, env = "CARRIER_SERVICE_ID", default_value_t = 1)]
    pub service_id: u32,

    /// Warehouse postal code used as the quote origin.
    #[arg(long, env = "WAREHOUSE_POSTAL_CODE", default_value = "03047-000")]
    pub origin: String,
}

/// Logging output settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is not set.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
