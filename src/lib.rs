//! Quill library exports for testing

pub mod core;
pub mod gateway;
pub mod tui;

#[cfg(test)]
pub mod test_support;
