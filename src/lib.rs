pub mod audio;
pub mod cloud;
pub mod config;
pub mod core;
pub mod input;
pub mod player;
pub mod pool;
