//! Library exports for the link shortener application
//!
//! This module exposes internal components for testing and potential library usage.

pub mod code;
pub mod database;
pub mod error;
pub mod handler;
pub mod model;
pub mod route;
pub mod service;
