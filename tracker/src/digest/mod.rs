//! Closed-issue and activity digests

pub mod activity;
pub mod closed;

pub use activity::render_activity_feed;
pub use closed::{collect_closed, render_closed_digest, ClosedSection};
