pub mod app_config;
pub mod candidate;
pub mod config;
pub mod record;
pub mod source;
pub mod store;

pub use app_config::{AppConfig, ProxyConfig};
pub use candidate::{CrossBorderReason, ProductRef, SearchPage, SellerCandidate};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use record::{regional_confidence, StorefrontRecord, PLATFORM_TAG};
pub use source::{PageSource, SourceError};
pub use store::{CategoryCount, StoreError, StorefrontStore};
