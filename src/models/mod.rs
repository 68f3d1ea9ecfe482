// src/models/mod.rs

pub mod exam;
pub mod mock_test;
pub mod user;
