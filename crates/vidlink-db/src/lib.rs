//! Persistence for video links and read access to the host's talk directory.

pub mod db;

pub use db::{
    InMemoryLinkRepository, InMemoryTalkDirectory, LinkRepository, PgLinkRepository,
    PgTalkDirectory, TalkDirectory,
};
