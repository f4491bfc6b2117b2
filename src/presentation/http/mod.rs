pub mod auth;
pub mod error;
pub mod folders;
pub mod health;
pub mod items;
pub mod links;
pub mod session;
pub mod users;
