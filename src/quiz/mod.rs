pub mod attempts;
pub mod db;
pub mod handlers;
pub mod models;
pub mod session;
