pub mod errors;
pub mod featured;
pub mod lifecycle;
pub mod models;
pub mod ports;
pub mod service;
