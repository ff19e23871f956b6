//! This module contains all the chunk related structures and logic.

pub mod block_entity;
pub mod chunk_access;
pub mod chunk_generator;
pub mod chunk_holder;
/// The chunk map drives generation of whole areas.
pub mod chunk_map;
pub mod chunk_status_tasks;
pub mod entity;
/// Superflat-style generator used for island worlds in protosky mode.
pub mod flat_chunk_generator;
pub mod generation_hooks;
pub mod heightmap;
pub mod level_chunk;
pub mod paletted_container;
pub mod proto_chunk;
pub mod section;
pub mod void_chunk_generator;
/// world gen
pub mod world_gen_context;
