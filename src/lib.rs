pub mod compose;
pub mod config;
pub mod domain;
pub mod ingest;
pub mod mail;
pub mod render;
pub mod session;
pub mod store;
pub mod terminal;
