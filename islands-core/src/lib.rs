//! # Islands core
//!
//! Chunk generation for sky-island worlds: the staged chunk pipeline, the
//! protosky sanitizer that empties island chunks, and the island registry,
//! dimensions and commands built on top of them.

pub mod blocks;
pub mod chunk;
pub mod config;
pub mod dimension;
pub mod islands;
