/// Constants for maze generation
/// Lower bound on random walk steps before a run is declared stuck
pub const MIN_WALK_BUDGET: u64 = 10_000;

/// Automatic zone placement
pub const DEFAULT_MAX_ZONE_FILL: f64 = 0.33;
pub const MAX_ZONE_PLACEMENT_ATTEMPTS: u32 = 10;
pub const ZONE_PLACEMENT_RETRIES: u32 = 3;

/// Zone size table as (width, height, weight)
pub const ZONE_SIZE_WEIGHTS: [(i32, i32, f64); 7] = [
    (2, 2, 0.25),
    (2, 3, 0.25),
    (3, 4, 0.15),
    (3, 6, 0.15),
    (4, 8, 0.075),
    (5, 6, 0.075),
    (7, 7, 0.005),
];

/// Share of each automatically placed zone type
pub const ZONE_TYPE_WEIGHTS: [(crate::maze::ZoneType, f64); 3] = [
    (crate::maze::ZoneType::Hall, 0.4),
    (crate::maze::ZoneType::Cave, 0.4),
    (crate::maze::ZoneType::Fill, 0.2),
];

/// Tags drawn for each automatically placed zone type
pub const HALL_TAG_WEIGHTS: [(&str, f64); 2] = [("room", 0.5), ("loot", 0.5)];
pub const CAVE_TAG_WEIGHTS: [(&str, f64); 3] = [("ruins", 0.3), ("den", 0.2), ("cave", 0.5)];
pub const FILL_TAG_WEIGHTS: [(&str, f64); 5] = [
    ("ruins", 0.2),
    ("lake", 0.2),
    ("dirt", 0.2),
    ("swamp", 0.2),
    ("void", 0.2),
];
