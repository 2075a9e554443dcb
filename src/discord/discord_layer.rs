// Discord layer - commands and event handlers.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "leveling/leveling_announcements.rs"]
pub mod leveling_announcements;

#[path = "leveling/message_xp.rs"]
pub mod message_xp;

#[path = "leveling/nickname_updater.rs"]
pub mod nickname_updater;

// Re-export command types for convenience
pub use commands::leveling::{Context, Data, Error};
