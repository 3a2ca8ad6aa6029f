// Engine configuration: defaults, optional config file, `CANDLE_*` env vars.
pub mod settings;

pub use settings::EngineSettings;
