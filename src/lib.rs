//! Spellduel - a side-view wizard duel
//!
//! The crate is the simulation core of a real-time two-player (or
//! player-versus-CPU) spell combat game: a fixed-step pipeline of
//! physics, terrain contact, entity collisions, spell-cast sequencing,
//! timers, and animation over a dynamic population of characters,
//! projectiles, and particles. Rendering and input mapping live outside;
//! the shipped binary drives an AI-versus-AI match headlessly.

pub mod core;
pub mod meta;
pub mod sim;
pub mod stage;
