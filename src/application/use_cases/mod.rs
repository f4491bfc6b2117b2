pub mod auth;
pub mod folders;
pub mod items;
pub mod links;
pub mod users;
