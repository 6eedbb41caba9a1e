pub mod backend;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod image_file;
pub mod wizard;
