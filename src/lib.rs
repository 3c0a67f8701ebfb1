pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod pagination;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod version;
