//! Mythos Arena - LLM-narrated battle simulation

pub mod battle;
pub mod core;
pub mod llm;
pub mod roster;
pub mod sprite;
