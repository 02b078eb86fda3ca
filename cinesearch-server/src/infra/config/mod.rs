pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader};
pub use models::{
    CacheConfig, CatalogConfig, Config, ConfigMetadata, CorsConfig,
    ServerConfig,
};
pub use sources::{EnvConfig, FileConfig};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
