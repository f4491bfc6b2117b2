pub mod create_folder;
pub mod delete_folder;
pub mod get_folder;
pub mod list_folders;
pub mod update_folder;
