pub mod api;
pub mod config;
pub mod init;
pub mod store;
pub mod upstream;
