mod button_config;
mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod storage_config;

pub(crate) use {
    button_config::ButtonConfig, capture_config::CaptureConfig, config::Config,
    storage_config::StorageConfig,
};
