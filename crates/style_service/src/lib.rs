pub mod config;
pub mod controllers;
pub mod dto;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod storage;

pub use server::AppState;
