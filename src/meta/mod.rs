//! Static entity and spell metadata, loaded once at startup

pub mod kinds;
pub mod spells;
