// src/lib.rs

//! Gan Airport flight board scraper library

pub mod cache;
pub mod error;
pub mod fetch;
pub mod models;
pub mod services;
pub mod storage;
