use crate::errors::{MazeError, MazeResult};
use crate::maze::coordinates::{GridSize, Position, parse_pair};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Index of a zone inside a maze's zone registry
pub type ZoneId = usize;

/// How the cells of a zone take part in generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ZoneType {
    /// Cells are excluded unless another zone claims them
    None,
    /// Context around the maze, ignored by the builder
    Environment,
    #[default]
    Maze,
    /// One logical room with a single entrance
    Hall,
    /// Open area with all internal walls removed
    Cave,
    /// Impassable, always excluded
    Fill,
}

impl ZoneType {
    pub const ALL: [ZoneType; 6] = [
        ZoneType::None,
        ZoneType::Environment,
        ZoneType::Maze,
        ZoneType::Hall,
        ZoneType::Cave,
        ZoneType::Fill,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ZoneType::None => "None",
            ZoneType::Environment => "Environment",
            ZoneType::Maze => "Maze",
            ZoneType::Hall => "Hall",
            ZoneType::Cave => "Cave",
            ZoneType::Fill => "Fill",
        }
    }

    /// Zones whose interior walls are removed once generation is done
    pub fn is_open_area(&self) -> bool {
        matches!(self, ZoneType::Hall | ZoneType::Cave)
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ZoneType {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ZoneType::ALL
            .into_iter()
            .find(|zone_type| zone_type.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| MazeError::InvalidZone {
                reason: format!("unknown zone type '{trimmed}'"),
            })
    }
}

/// Rectangular tagged region of the maze
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub zone_type: ZoneType,
    /// Lowest corner of the rectangle
    pub position: Position,
    pub size: GridSize,
    tags: Vec<String>,
}

impl Zone {
    pub fn new(zone_type: ZoneType, position: Position, size: GridSize) -> Self {
        Self {
            zone_type,
            position,
            size,
            tags: Vec::new(),
        }
    }

    /// Replace the tags. Tags end up in the maze text, so they must be non-empty,
    /// carry no surrounding whitespace and avoid the `,` `;` `|` separators.
    pub fn with_tags(
        mut self,
        tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> MazeResult<Self> {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        if let Some(tag) = tags.iter().find(|tag| !is_valid_tag(tag)) {
            return Err(MazeError::InvalidZone {
                reason: format!(
                    "tag '{tag}' must be non-empty, unpadded and free of ',', ';' and '|'"
                ),
            });
        }
        self.tags = tags;
        Ok(self)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Exclusive far corner, widened so it cannot overflow
    fn far_corner(&self) -> (i64, i64) {
        (
            i64::from(self.position.x) + i64::from(self.size.width),
            i64::from(self.position.y) + i64::from(self.size.height),
        )
    }

    pub fn contains(&self, position: Position) -> bool {
        let (end_x, end_y) = self.far_corner();
        let (x, y) = (i64::from(position.x), i64::from(position.y));
        x >= i64::from(self.position.x)
            && y >= i64::from(self.position.y)
            && x < end_x
            && y < end_y
    }

    pub fn overlaps(&self, other: &Zone) -> bool {
        let (end_x, end_y) = self.far_corner();
        let (other_end_x, other_end_y) = other.far_corner();
        i64::from(self.position.x) < other_end_x
            && i64::from(other.position.x) < end_x
            && i64::from(self.position.y) < other_end_y
            && i64::from(other.position.y) < end_y
    }

    /// Whether the whole rectangle lies inside a maze of the given size
    pub fn fits_into(&self, maze_size: GridSize) -> bool {
        let (end_x, end_y) = self.far_corner();
        self.size.width > 0
            && self.size.height > 0
            && self.position.x >= 0
            && self.position.y >= 0
            && end_x <= i64::from(maze_size.width)
            && end_y <= i64::from(maze_size.height)
    }

    /// Columns and rows of the rectangle grown by `margin` cells on every side,
    /// clipped to a maze of the given size
    pub(crate) fn clipped_span(
        &self,
        maze_size: GridSize,
        margin: i32,
    ) -> (Range<i32>, Range<i32>) {
        let clip = |start: i32, length: i32, limit: i32| {
            let limit = i64::from(limit.max(0));
            let low = (i64::from(start) - i64::from(margin)).clamp(0, limit);
            let high = (i64::from(start) + i64::from(length.max(0)) + i64::from(margin))
                .clamp(low, limit);
            // 0 <= low <= high <= limit, so both fit back into i32
            (low as i32)..(high as i32)
        };
        (
            clip(self.position.x, self.size.width, maze_size.width),
            clip(self.position.y, self.size.height, maze_size.height),
        )
    }

    /// Positions covered by the zone inside a maze of the given size, row by row
    pub fn positions_within(&self, maze_size: GridSize) -> impl Iterator<Item = Position> {
        let (columns, rows) = self.clipped_span(maze_size, 0);
        rows.flat_map(move |y| columns.clone().map(move |x| Position::new(x, y)))
    }
}

fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty() && tag.trim() == tag && !tag.contains([',', ';', '|'])
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P{}x{};S{};{}",
            self.position.x, self.position.y, self.size, self.zone_type
        )?;
        for tag in &self.tags {
            write!(f, ";{tag}")?;
        }
        Ok(())
    }
}

impl FromStr for Zone {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| MazeError::InvalidZone { reason };
        let mut parts = s.trim().split(';');

        let position = parts
            .next()
            .and_then(|part| part.strip_prefix('P'))
            .ok_or_else(|| invalid(format!("'{s}' is missing its P{{x}}x{{y}} position")))?;
        let (x, y) = parse_pair(position, "zone position").map_err(|e| invalid(e.to_string()))?;

        let size = parts
            .next()
            .and_then(|part| part.strip_prefix('S'))
            .ok_or_else(|| invalid(format!("'{s}' is missing its S{{w}}x{{h}} size")))?;
        let (width, height) = parse_pair(size, "zone size").map_err(|e| invalid(e.to_string()))?;
        if width <= 0 || height <= 0 {
            return Err(invalid(format!("'{s}' has an empty size")));
        }
        if x.checked_add(width).is_none() || y.checked_add(height).is_none() {
            return Err(invalid(format!("'{s}' reaches past the coordinate range")));
        }

        let zone_type = match parts.next() {
            Some(name) => name.parse()?,
            None => ZoneType::Maze,
        };

        Zone::new(zone_type, Position::new(x, y), GridSize::new(width, height))
            .with_tags(parts.filter(|tag| !tag.is_empty()))
    }
}

/// Parse a comma separated list of zones
pub fn parse_zone_list(input: &str) -> MazeResult<Vec<Zone>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_text_form() {
        let zone = Zone::new(ZoneType::Hall, Position::new(1, 2), GridSize::new(3, 4));
        assert_eq!(zone.to_string(), "P1x2;S3x4;Hall");
        assert_eq!("P1x2;S3x4;Hall".parse::<Zone>().unwrap(), zone);

        let tagged = zone.clone().with_tags(["boss", "lit"]).unwrap();
        assert_eq!(tagged.to_string(), "P1x2;S3x4;Hall;boss;lit");
        assert_eq!(tagged.to_string().parse::<Zone>().unwrap(), tagged);
    }

    #[test]
    fn test_zone_type_parsing() {
        assert_eq!("cave".parse::<ZoneType>().unwrap(), ZoneType::Cave);
        assert_eq!("FILL".parse::<ZoneType>().unwrap(), ZoneType::Fill);
        assert!("lake".parse::<ZoneType>().is_err());
        assert_eq!("P0x0;S1x1".parse::<Zone>().unwrap().zone_type, ZoneType::Maze);
    }

    #[test]
    fn test_invalid_zone_text() {
        assert!("0x0;S1x1;Hall".parse::<Zone>().is_err());
        assert!("P0x0;1x1;Hall".parse::<Zone>().is_err());
        assert!("P0x0;S0x1;Hall".parse::<Zone>().is_err());
        assert!("P0x0;S1x1;Pond".parse::<Zone>().is_err());
    }

    #[test]
    fn test_zone_geometry() {
        let zone = Zone::new(ZoneType::Fill, Position::new(1, 1), GridSize::new(2, 2));
        assert!(zone.contains(Position::new(1, 1)));
        assert!(zone.contains(Position::new(2, 2)));
        assert!(!zone.contains(Position::new(3, 1)));
        assert!(!zone.contains(Position::new(0, 1)));
        assert_eq!(zone.positions_within(GridSize::new(5, 5)).count(), 4);
        assert_eq!(
            zone.positions_within(GridSize::new(2, 5)).collect::<Vec<_>>(),
            vec![Position::new(1, 1), Position::new(1, 2)]
        );

        let touching = Zone::new(ZoneType::Cave, Position::new(3, 1), GridSize::new(2, 2));
        let crossing = Zone::new(ZoneType::Cave, Position::new(2, 2), GridSize::new(2, 2));
        assert!(!zone.overlaps(&touching));
        assert!(zone.overlaps(&crossing));

        assert!(zone.fits_into(GridSize::new(3, 3)));
        assert!(!zone.fits_into(GridSize::new(2, 3)));
    }

    #[test]
    fn test_zone_list() {
        let zones = parse_zone_list("P0x0;S2x2;Fill, P3x3;S2x2;Cave").unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[1].zone_type, ZoneType::Cave);
        assert!(parse_zone_list("").unwrap().is_empty());
    }

    #[test]
    fn test_zone_geometry_at_coordinate_limits() {
        let far = Zone::new(ZoneType::Fill, Position::new(i32::MAX, 0), GridSize::new(2, 1));
        assert!(far.contains(Position::new(i32::MAX, 0)));
        assert!(!far.fits_into(GridSize::new(3, 3)));
        assert_eq!(far.positions_within(GridSize::new(3, 3)).count(), 0);

        let corner = Position::new(i32::MIN, i32::MIN);
        let near = Zone::new(ZoneType::Cave, corner, GridSize::new(i32::MAX, i32::MAX));
        assert!(near.overlaps(&near));
        assert!(!near.overlaps(&far));
        assert!(!near.contains(Position::new(0, 0)));

        let endless = GridSize::new(i32::MAX, i32::MAX);
        let huge = Zone::new(ZoneType::Hall, Position::new(1, 1), endless);
        assert_eq!(huge.positions_within(GridSize::new(3, 3)).count(), 4);
        let (columns, rows) = huge.clipped_span(GridSize::new(3, 3), 1);
        assert_eq!((columns, rows), (0..3, 0..3));

        assert!(matches!(
            "P2147483647x0;S2x1;Fill".parse::<Zone>(),
            Err(MazeError::InvalidZone { .. })
        ));
        assert!("P2147483646x0;S1x1;Fill".parse::<Zone>().is_ok());
    }

    #[test]
    fn test_tags_must_survive_the_text_form() {
        let zone = Zone::new(ZoneType::Cave, Position::new(0, 0), GridSize::new(1, 1));
        for tag in ["a,b", "x|y", "c;d", "", " lit"] {
            assert!(
                matches!(zone.clone().with_tags([tag]), Err(MazeError::InvalidZone { .. })),
                "accepted tag '{tag}'"
            );
        }

        let tagged = zone.with_tags(["old ruins", "lvl:2"]).unwrap();
        assert_eq!(tagged.tags(), ["old ruins", "lvl:2"]);
        assert_eq!(tagged.to_string().parse::<Zone>().unwrap(), tagged);
        assert!(matches!(
            "P0x0;S1x1;Cave;a,b".parse::<Zone>(),
            Err(MazeError::InvalidZone { .. })
        ));
    }
}
