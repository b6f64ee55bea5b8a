//! Upload videos to a GitHub repository through the Contents API and address
//! them through the jsDelivr CDN, from the command line or a small web form.

pub mod cli;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
