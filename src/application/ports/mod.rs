pub mod folder_repository;
pub mod item_position_repository;
pub mod link_repository;
pub mod session_store;
pub mod user_repository;
