pub mod color;
pub mod confirm_delete;
pub mod tabs;
pub mod goal_list;
pub mod goal_view;
pub mod editor;
pub mod status_bar;
pub mod help;
pub mod form;
pub mod summary;
