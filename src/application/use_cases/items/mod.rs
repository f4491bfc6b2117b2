pub mod browse_items;
pub mod list_folder_items;
pub mod list_items;
pub mod move_item;
pub mod update_positions;
