//! # Core Application Logic
//!
//! This module contains Quill's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌──────────────────────────┐
//!                    │           CORE           │
//!                    │      (this module)       │
//!                    │                          │
//!                    │  • segment (reply split) │
//!                    │  • reveal (typewriter)   │
//!                    │  • transcript            │
//!                    │  • update() (reducer)    │
//!                    │                          │
//!                    │   No I/O. No UI. Pure.   │
//!                    └────────────┬─────────────┘
//!                                 │ Effect
//!                  ┌──────────────┴──────────────┐
//!                  ▼                             ▼
//!           ┌────────────┐                ┌────────────┐
//!           │    TUI     │                │  Gateway   │
//!           │  Adapter   │                │   (HTTP)   │
//!           │ (ratatui)  │                │            │
//!           └────────────┘                └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`segment`]: Title/paragraph split of a raw reply
//! - [`reveal`]: Character-by-character reveal runs and the scheduler
//! - [`transcript`]: Message entries, reply slots and the typing placeholder
//! - [`config`]: Layered configuration

pub mod action;
pub mod config;
pub mod reveal;
pub mod segment;
pub mod state;
pub mod transcript;
