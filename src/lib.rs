//! Pokedex TUI - card viewer over PokeAPI
//!
//! The library exposes the store pieces and components so the binary and
//! the integration tests share them.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod hydrate;
pub mod logging;
pub mod reducer;
pub mod search;
pub mod state;
