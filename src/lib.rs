pub mod api;
pub mod auth;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod search;
pub mod server;
pub mod store;

#[cfg(test)]
mod test_data;
