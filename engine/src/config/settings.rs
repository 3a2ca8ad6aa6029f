// Engine settings, loaded from defaults, an optional config file and the environment
use crate::candles::window::WindowZone;
use crate::error::EngineError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_PREFIX: &str = "CANDLE";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EngineSettings {
    pub host: String,
    pub port: u16,
    /// CSV file with `time,code,price` rows, reopened on every candle request.
    pub data_file: String,
    /// Zone used to read the calendar values of a candle query:
    /// `Local`, a fixed offset like `+09:00`, or an IANA name like `Asia/Tokyo`.
    pub timezone: String,
    pub request_timeout_secs: u64,
    pub flag_reply: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_file: "order_books.csv".to_string(),
            timezone: "Local".to_string(),
            request_timeout_secs: 30,
            flag_reply: "flag{this_is_fake_flag}".to_string(),
        }
    }
}

impl EngineSettings {
    // Layers, lowest priority first: built-in defaults, `path` (if given), CANDLE_* env vars.
    pub fn load(path: Option<&str>) -> Result<Self, EngineError> {
        let defaults = Config::try_from(&EngineSettings::default()).map_err(config_error)?;
        let mut builder = Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(config_error)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn window_zone(&self) -> Result<WindowZone, EngineError> {
        self.timezone.parse()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn config_error(err: config::ConfigError) -> EngineError {
    EngineError::ConfigError(err.to_string())
}
