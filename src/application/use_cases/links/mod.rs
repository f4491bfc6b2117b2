pub mod create_link;
pub mod delete_link;
pub mod get_link;
pub mod list_links;
pub mod update_link;
