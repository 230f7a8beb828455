//! State module for tracking crawl progress
//!
//! A crawl moves through `Idle -> Running -> {Done, Failed}`. The state
//! machine lives here so the controller can reject illegal transitions
//! instead of silently continuing from a terminal state.

mod crawl_state;

pub use crawl_state::CrawlState;
