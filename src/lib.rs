//! Text-to-speech over local HTTP: an API service that relays requests to a
//! speech backend, and a client that manages the service and talks to it.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod tts;
