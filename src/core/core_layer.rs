// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "leveling/mod.rs"]
pub mod leveling;
