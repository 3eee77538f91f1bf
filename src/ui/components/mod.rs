pub mod app_list;
pub mod detail_panel;
pub mod footer;
pub mod header;
pub mod modal;
pub mod tabs;
