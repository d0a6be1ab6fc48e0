// src/hud/mod.rs
pub mod client;
pub mod models;

pub use client::{download_all, DEFAULT_PAGE_URL};
