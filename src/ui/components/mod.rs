pub mod composer_panel;
pub mod map_canvas;
pub mod message_list;
pub mod status_banner;
