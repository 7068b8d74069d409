//! A world map on which fans drop a pin and leave a short note for everyone
//! else to read. Messages live in a hosted Postgres table reached through its
//! REST API; this crate is the desktop board in front of it.

pub mod common;
pub mod config;
pub mod geo;
pub mod map;
pub mod network;
pub mod storage;
pub mod ui;
