pub mod errors;
pub mod models;
pub mod source;
pub mod stream_selector;
pub mod url_parser;
pub mod video_parser;

pub use source::{ContentSource, YouTubeSource};
