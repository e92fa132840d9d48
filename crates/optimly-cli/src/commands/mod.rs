pub mod config;
pub mod lab;
pub mod onboard;
