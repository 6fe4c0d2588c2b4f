pub mod menu;
pub mod summary;
