// src/lib.rs

//! Cookbot Library
//!
//! Picks a recipe that has not been posted yet, drafts a post for it and
//! publishes it to a Facebook page.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
