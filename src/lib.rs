pub mod cli_options;
pub mod config;
pub mod image;
pub mod pathintegrator;
pub mod renderer;
