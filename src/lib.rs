//! Terminal client for a chat backend: an interactive transcript TUI
//! (single/multi-turn chat with remote history) and a one-shot Q&A client.

pub mod api;
pub mod app;
pub mod config;
pub mod handler;
pub mod session;
pub mod tui;
pub mod ui;
