pub mod cli;
pub mod common;
pub mod downloader;
pub mod parser;
pub mod post_process;

pub type Result<T> = anyhow::Result<T>;
