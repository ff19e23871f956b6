//! End-to-end checks of protosky mode.
//!
//! Chunks are compared through MD5 hashes of their block data, so a stripped
//! island chunk must hash exactly like a chunk that was never filled.

use std::sync::Arc;

use islands_core::blocks;
use islands_core::chunk::{
    block_entity::BlockEntity,
    chunk_access::ChunkStatus,
    chunk_map::ChunkMap,
    flat_chunk_generator::FlatChunkGenerator,
    heightmap::{COLUMN_COUNT, HeightmapType},
    proto_chunk::ProtoChunk,
    section::Sections,
    world_gen_context::{ChunkGeneratorType, WorldGenContext},
};
use islands_core::config::{IslandsConfig, IslandsSettings};
use islands_core::dimension::DimensionType;
use islands_core::islands::{ISLAND_NAMESPACE, new_island_key, protosky::ProtoskySanitizer};
use islands_utils::{BitStorage, BlockPos, ChunkPos, Identifier};

const RADIUS: i32 = 2;

fn compute_block_hash(sections: &Sections) -> String {
    let mut ctx = md5::Context::new();

    for section in &sections.sections {
        if section.is_empty() {
            ctx.consume([0u8]);
        } else {
            for y in 0..16 {
                for z in 0..16 {
                    for x in 0..16 {
                        let state_id = u32::from(section.states.get(x, y, z));
                        ctx.consume(state_id.to_be_bytes());
                    }
                }
            }
        }
    }

    format!("{:x}", ctx.finalize())
}

fn settings(protosky_mode: bool) -> Arc<IslandsSettings> {
    Arc::new(IslandsSettings::in_memory(IslandsConfig {
        protosky_mode,
        ..IslandsConfig::default()
    }))
}

fn chunk_map(dimension: Identifier, settings: Arc<IslandsSettings>) -> ChunkMap {
    let context = WorldGenContext::new(
        dimension,
        DimensionType::island_overworld(),
        Arc::new(ChunkGeneratorType::Flat(FlatChunkGenerator::default())),
    )
    .with_hook(Arc::new(ProtoskySanitizer::new(settings)));
    ChunkMap::new(Arc::new(context))
}

fn area() -> impl Iterator<Item = ChunkPos> {
    (-RADIUS..=RADIUS).flat_map(|z| (-RADIUS..=RADIUS).map(move |x| ChunkPos::new(x, z)))
}

fn hash_at(map: &ChunkMap, pos: ChunkPos) -> String {
    map.with_chunk(pos, |chunk| compute_block_hash(chunk.sections()))
        .expect("chunk should be loaded")
}

fn entity_count_at(map: &ChunkMap, pos: ChunkPos) -> usize {
    map.with_chunk(pos, |chunk| {
        chunk.as_proto().map_or(0, |proto| proto.entities().len())
    })
    .expect("chunk should be loaded")
}

#[test]
fn stripped_chunk_loses_everything() {
    let mut chunk = ProtoChunk::new(Sections::empty(16), ChunkPos::new(3, 7), 0, 256);
    for section in 0..3 {
        for x in 0..16 {
            chunk.set_relative_block(x, section * 16 + 4, 0, blocks::STONE);
        }
    }
    let chests = [BlockPos::new(50, 1, 113), BlockPos::new(60, 2, 120)];
    for pos in chests {
        chunk.set_block_state(pos, blocks::CHEST);
        chunk.set_block_entity(BlockEntity::new(Identifier::vanilla_static("chest"), pos));
    }
    for i in 0..4 {
        chunk.set_block_state(BlockPos::new(48 + i, 40, 127), blocks::GLOWSTONE);
    }
    chunk.prime_heightmaps(&HeightmapType::WORLDGEN);
    chunk.set_status(ChunkStatus::Features);

    assert_eq!(chunk.sections().non_empty_count(), 3);
    assert_eq!(chunk.block_entity_count(), 2);
    assert_eq!(chunk.light_sources().len(), 4);
    assert_eq!(chunk.heightmaps().count(), 2);

    let island = Identifier::new_static(ISLAND_NAMESPACE, "3b241101-e2bb-4255-8caf-4136c566a962");
    let sanitizer = ProtoskySanitizer::new(settings(true));
    assert!(sanitizer.strip_before_light(&island, ChunkStatus::Light, &mut chunk));

    assert_eq!(chunk.sections().non_empty_count(), 0);
    assert_eq!(chunk.block_entity_count(), 0);
    assert_eq!(chunk.light_sources().len(), 0);
    let zero = BitStorage::new(9, COLUMN_COUNT);
    assert_eq!(chunk.heightmaps().count(), 2);
    for (_, heightmap) in chunk.heightmaps() {
        assert_eq!(heightmap.storage(), &zero);
    }
    assert_eq!(
        compute_block_hash(chunk.sections()),
        compute_block_hash(&Sections::empty(16))
    );
}

#[test]
fn island_pipeline_produces_empty_chunks() {
    let map = chunk_map(new_island_key(), settings(true));
    map.generate_area(ChunkPos::new(0, 0), RADIUS, ChunkStatus::Full)
        .unwrap();

    let empty = compute_block_hash(&Sections::empty(16));
    let mismatches: Vec<ChunkPos> = area().filter(|pos| hash_at(&map, *pos) != empty).collect();
    assert!(
        mismatches.is_empty(),
        "chunks with leftover blocks: {mismatches:?}"
    );

    for pos in area() {
        let (block_entities, heightmap_zero) = map
            .with_chunk(pos, |chunk| {
                let full = chunk.as_full().expect("chunk should be full");
                (
                    full.block_entity_count(),
                    full.heightmap(HeightmapType::MotionBlocking)
                        .is_some_and(|map| {
                            map.storage() == &BitStorage::new(map.bits(), COLUMN_COUNT)
                        }),
                )
            })
            .unwrap();
        assert_eq!(block_entities, 0);
        assert!(heightmap_zero);
    }
}

#[test]
fn island_population_has_no_entities() {
    for protosky_mode in [true, false] {
        let map = chunk_map(new_island_key(), settings(protosky_mode));
        map.generate_area(ChunkPos::new(0, 0), RADIUS, ChunkStatus::Spawn)
            .unwrap();
        for pos in area() {
            assert_eq!(entity_count_at(&map, pos), 0);
        }
    }
}

#[test]
fn protosky_off_keeps_terrain() {
    let map = chunk_map(new_island_key(), settings(false));
    map.generate_area(ChunkPos::new(0, 0), RADIUS, ChunkStatus::Full)
        .unwrap();
    let empty = compute_block_hash(&Sections::empty(16));
    assert!(area().all(|pos| hash_at(&map, pos) != empty));
}

#[test]
fn other_dimensions_are_untouched() {
    let map = chunk_map(Identifier::vanilla_static("overworld"), settings(true));
    map.generate_area(ChunkPos::new(0, 0), RADIUS, ChunkStatus::Spawn)
        .unwrap();

    let empty = compute_block_hash(&Sections::empty(16));
    for pos in area() {
        assert_ne!(hash_at(&map, pos), empty);
        assert_eq!(entity_count_at(&map, pos), 1);
        let light_sources = map
            .with_chunk(pos, |chunk| {
                chunk.as_proto().map_or(0, |proto| proto.light_sources().len())
            })
            .unwrap();
        assert_eq!(light_sources, 1);
    }

    // Every chunk of the square was generated from the same layers.
    let first = hash_at(&map, ChunkPos::new(-RADIUS, -RADIUS));
    assert!(area().all(|pos| hash_at(&map, pos) == first));
}
