// Configuration module
// Public interface for configuration loading

pub mod constants;
mod loader;
mod provider;
mod settings;

pub use loader::{apply_env, config_path, load_config, load_from_path};
pub use provider::ProviderEntry;
pub use settings::{
    config_dir, Config, GenerationConfig, ResearchConfig, ServerConfig, StoreConfig,
};
