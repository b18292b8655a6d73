pub mod ui;
pub mod widget;
