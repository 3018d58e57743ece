use super::constants::{
    CAVE_TAG_WEIGHTS, DEFAULT_MAX_ZONE_FILL, FILL_TAG_WEIGHTS, HALL_TAG_WEIGHTS,
    MAX_ZONE_PLACEMENT_ATTEMPTS, ZONE_PLACEMENT_RETRIES, ZONE_SIZE_WEIGHTS, ZONE_TYPE_WEIGHTS,
};
use crate::maze::{GridSize, Position, Zone, ZoneType};
use pathfinding::prelude::bfs_reach;
use rand::Rng;
use tracing::{debug, warn};

/// Random positions tried for each zone before giving up on it
const POSITION_TRIES: u32 = 25;

#[derive(Debug, Clone, PartialEq)]
pub struct ZonePlacementConfig {
    /// Upper bound on the share of the maze covered by zones
    pub max_fill: f64,
    /// Zones drawn per placement round
    pub attempts: u32,
    /// Placement rounds before settling for a partial result
    pub retries: u32,
}

impl Default for ZonePlacementConfig {
    fn default() -> Self {
        Self {
            max_fill: DEFAULT_MAX_ZONE_FILL,
            attempts: MAX_ZONE_PLACEMENT_ATTEMPTS,
            retries: ZONE_PLACEMENT_RETRIES,
        }
    }
}

/// Picks and positions random Hall, Cave and Fill zones inside a maze
#[derive(Debug, Clone, Default)]
pub struct ZonePlacer {
    config: ZonePlacementConfig,
}

impl ZonePlacer {
    pub fn new(config: ZonePlacementConfig) -> Self {
        Self { config }
    }

    /// Zones placed inside the maze, never overlapping each other or the border
    /// and never cutting passable cells into separate regions.
    pub fn place<R: Rng + ?Sized>(&self, size: GridSize, rng: &mut R) -> Vec<Zone> {
        let inner = GridSize::new(size.width - 2, size.height - 2);
        let any_fits = ZONE_SIZE_WEIGHTS
            .iter()
            .any(|&(w, h, _)| w <= inner.width && h <= inner.height);
        if !any_fits {
            debug!("No zone size fits into a {} maze", size);
            return Vec::new();
        }

        let mut best = Vec::new();
        for round in 1..=self.config.retries {
            let zones = self.pick_zones(size, rng);
            let wanted = zones.len();
            let placed = self.position_zones(size, zones, rng);
            if placed.len() == wanted {
                debug!("Placed {} zones in round {}", wanted, round);
                return placed;
            }
            debug!("Round {} placed {} of {} zones", round, placed.len(), wanted);
            if placed.len() > best.len() {
                best = placed;
            }
        }
        warn!(
            "Zone placement incomplete after {} rounds, using {} zones",
            self.config.retries,
            best.len()
        );
        best
    }

    /// Unpositioned zones whose total area stays under the fill limit
    fn pick_zones<R: Rng + ?Sized>(&self, size: GridSize, rng: &mut R) -> Vec<Zone> {
        let limit = size.area() as f64 * self.config.max_fill;
        let mut occupied = 0usize;
        let mut zones = Vec::new();
        for _ in 0..self.config.attempts {
            if occupied as f64 >= limit {
                break;
            }
            let Some(zone) = random_zone(rng) else {
                break;
            };
            let area = zone.size.area();
            if ((occupied + area) as f64) < limit {
                occupied += area;
                zones.push(zone);
            }
        }
        zones
    }

    fn position_zones<R: Rng + ?Sized>(
        &self,
        size: GridSize,
        zones: Vec<Zone>,
        rng: &mut R,
    ) -> Vec<Zone> {
        let mut placed: Vec<Zone> = Vec::new();
        for mut zone in zones {
            let max_x = size.width - zone.size.width - 1;
            let max_y = size.height - zone.size.height - 1;
            if max_x < 1 || max_y < 1 {
                continue;
            }
            for _ in 0..POSITION_TRIES {
                zone.position = Position::new(rng.gen_range(1..=max_x), rng.gen_range(1..=max_y));
                if placed.iter().any(|other| other.overlaps(&zone)) {
                    continue;
                }
                placed.push(zone.clone());
                if keeps_maze_connected(size, &placed) {
                    break;
                }
                placed.pop();
            }
        }
        placed
    }
}

/// Whether cells outside Hall and Fill zones still form a single region
pub fn keeps_maze_connected(size: GridSize, zones: &[Zone]) -> bool {
    let blocked = |position: Position| {
        zones.iter().any(|zone| {
            matches!(zone.zone_type, ZoneType::Hall | ZoneType::Fill) && zone.contains(position)
        })
    };
    let passable: Vec<Position> = (0..size.area())
        .map(|index| size.position_of(index))
        .filter(|&position| !blocked(position))
        .collect();
    let Some(&start) = passable.first() else {
        return true;
    };

    let reached = bfs_reach(start, |&position| {
        Position::DIRECTIONS
            .iter()
            .map(move |&direction| position + direction)
            .filter(|&next| size.contains(next) && !blocked(next))
            .collect::<Vec<_>>()
    })
    .count();
    reached == passable.len()
}

fn pick_weighted<T: Copy, R: Rng + ?Sized>(table: &[(T, f64)], rng: &mut R) -> Option<T> {
    let roll: f64 = rng.gen_range(0.0..1.0);
    let mut cumulative = 0.0;
    for &(item, weight) in table {
        cumulative += weight;
        if roll < cumulative {
            return Some(item);
        }
    }
    table.last().map(|&(item, _)| item)
}

fn random_zone<R: Rng + ?Sized>(rng: &mut R) -> Option<Zone> {
    let zone_type = pick_weighted(&ZONE_TYPE_WEIGHTS, rng)?;
    let sizes: Vec<(GridSize, f64)> = ZONE_SIZE_WEIGHTS
        .iter()
        .map(|&(w, h, weight)| (GridSize::new(w, h), weight))
        .collect();
    let mut size = pick_weighted(&sizes, rng)?;
    if rng.gen_bool(0.5) {
        size = size.rotated();
    }
    let tags: &[(&str, f64)] = match zone_type {
        ZoneType::Hall => &HALL_TAG_WEIGHTS,
        ZoneType::Cave => &CAVE_TAG_WEIGHTS,
        _ => &FILL_TAG_WEIGHTS,
    };
    let tag = pick_weighted(tags, rng)?;
    Zone::new(zone_type, Position::default(), size)
        .with_tags([tag])
        .ok()
}
