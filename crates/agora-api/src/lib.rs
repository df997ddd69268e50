pub mod auth;
pub mod boards;
pub mod comments;
pub mod error;
pub mod middleware;
pub mod profile;
pub mod users;
