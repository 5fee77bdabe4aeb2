pub mod auth;
pub mod group;
pub mod user;
