pub mod data;
pub mod io;
pub mod printing;
pub mod settings;

pub use data::Config;
pub use io::ConfigError;
pub use settings::Settings;
