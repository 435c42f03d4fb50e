//! Transit arrival board server.
//!
//! Polls real-time subway feeds and answers two questions for a wall
//! display: "when are the next trains at my stations?" and "which trains
//! are on their way down the corridor, and when do I need to leave?"

pub mod arrivals;
pub mod board;
pub mod cache;
pub mod config;
pub mod corridor;
pub mod domain;
pub mod feed;
pub mod health;
pub mod stops;
pub mod web;
