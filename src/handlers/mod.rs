pub mod pages;
pub mod video_handlers;
