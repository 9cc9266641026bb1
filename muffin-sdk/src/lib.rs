//! Muffin SDK
//!
//! Wire types shared by the Muffin backend and its clients, plus typed HTTP
//! clients for the utility data provider and the forecasting API.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod objects;
