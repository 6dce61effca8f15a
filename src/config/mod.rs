pub mod settings;

pub use settings::{AgentSettings, DatabaseSettings, MetricsSettings, ServerSettings, Settings};
