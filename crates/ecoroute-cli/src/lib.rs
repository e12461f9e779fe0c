//! ecoroute CLI library.
//!
//! Command handlers, the interactive menu and terminal rendering for the
//! `ecoroute` binary. Route computation lives in `ecoroute_lib`; this crate
//! only parses arguments and presents results.

pub mod commands;
pub mod menu;
pub mod output;
pub mod terminal;
