//! Tourism performance pipeline: load a tourism export, derive the
//! Category Performance Score and Tourism Diversity Index, and summarize a
//! Country/Category selection.

pub mod config;
pub mod data;
pub mod report;
pub mod state;
