pub mod archive;
pub mod auth;
