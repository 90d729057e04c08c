//! HTTP request handlers.

pub mod pages;
