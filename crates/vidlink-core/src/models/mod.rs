//! Data models
//!
//! `event` holds the read-only host entities (events and their talks);
//! `video_link` holds the talk to video association this service owns.

mod event;
mod video_link;

pub use event::*;
pub use video_link::*;
