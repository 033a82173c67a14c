mod config;

pub use config::{
    CryptoSettings, GithubSettings, ReportSettings, Settings, StorageSettings, WeatherSettings,
};
