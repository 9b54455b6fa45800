pub mod app_config;
pub mod config;
pub mod handle;
pub mod product;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use handle::Handle;
pub use product::{
    Money, PriceRange, Product, ProductImage, ProductOption, ProductVariant, SelectedOption,
    Selection, DEGENERATE_OPTION_NAME,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid product handle \"{handle}\": {reason}")]
    InvalidHandle { handle: String, reason: String },

    #[error("product {product_id}: option \"{option}\" declares value \"{value}\" more than once")]
    DuplicateOptionValue {
        product_id: String,
        option: String,
        value: String,
    },

    #[error("variant {variant_id}: missing a value for option \"{option}\"")]
    MissingOptionValue { variant_id: String, option: String },

    #[error("variant {variant_id}: option \"{option}\" is not declared by the product")]
    UndeclaredOption { variant_id: String, option: String },

    #[error("variant {variant_id}: option \"{option}\" carries more than one value")]
    RepeatedOption { variant_id: String, option: String },

    #[error("variant {variant_id}: \"{value}\" is not a declared value of option \"{option}\"")]
    UnknownOptionValue {
        variant_id: String,
        option: String,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
