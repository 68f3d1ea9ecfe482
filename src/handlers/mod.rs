// src/handlers/mod.rs

pub mod analytics;
pub mod auth;
pub mod chat;
pub mod exam;
pub mod profile;
