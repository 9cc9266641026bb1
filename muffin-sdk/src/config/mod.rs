//! Runtime configuration types for Muffin.
//!
//! These types represent validated configuration and are shared across
//! crates. Loading and parsing the config file is handled by the server crate.

mod bayou;
mod forecast;
mod palmetto;
mod server;

pub use bayou::BayouConfig;
pub use forecast::ForecastConfig;
pub use palmetto::PalmettoConfig;
pub use server::ServerConfig;
