//! # Order relay server
//! Hosts the order relay worker and exposes a small HTTP control surface for it.
//!
//! ## Configuration
//! The server is configured via environment variables (a `.env` file is honoured). See [config](config/index.html)
//! for more information.
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/status`: Whether the relay is active, the number of processed orders and the polling settings.
//! * `/start`, `/stop` (POST): Start and stop the polling loop.
//! * `/logs`: The relay's log lines since the last start.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod log_buffer;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
