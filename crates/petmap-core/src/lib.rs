pub mod app_config;
pub mod category;
pub mod config;
pub mod district;
pub mod facility;
pub mod filter;
pub mod geo;

pub use app_config::{AppConfig, Environment};
pub use category::{
    load_category_groups, Category, CategoryGroups, CategoryKey, ParseCategoryKeyError,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use district::District;
pub use facility::{Facility, FacilityId, OpeningHours, PetPolicy};
pub use filter::{filter_facilities, CompiledFilter, FilterSelection};
pub use geo::{Bounds, Coordinate, CoordinateError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read category groups file {path}: {source}")]
    CategoriesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse category groups file: {0}")]
    CategoriesFileParse(#[from] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}
