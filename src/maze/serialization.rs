use crate::errors::{MazeError, MazeResult};
use crate::maze::MazeGraph;
use crate::maze::coordinates::GridSize;
use crate::maze::zones::parse_zone_list;
use std::fmt;
use std::str::FromStr;

impl MazeGraph {
    /// Canonical text form: `{w}x{h}|{zone},...|{cell}:{link} {link},...`
    pub fn serialize(&self) -> String {
        let zones: Vec<String> = self.zones().iter().map(ToString::to_string).collect();
        let cells: Vec<String> = self
            .cells()
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| {
                let higher: Vec<String> = cell
                    .links()
                    .iter()
                    .filter(|&&link| link > index)
                    .map(ToString::to_string)
                    .collect();
                (!higher.is_empty()).then(|| format!("{index}:{}", higher.join(" ")))
            })
            .collect();
        format!("{}|{}|{}", self.size(), zones.join(","), cells.join(","))
    }

    /// Parse the canonical form or the older `{w}x{h};{cell}:{link},{link};...` form
    pub fn parse(text: &str) -> MazeResult<Self> {
        let text = text.trim();
        if text.contains('|') {
            parse_sectioned(text)
        } else {
            parse_legacy(text)
        }
    }
}

fn parse_failed(reason: String) -> MazeError {
    MazeError::ParseFailed { reason }
}

fn parse_size(text: &str) -> MazeResult<GridSize> {
    let size: GridSize = text.parse()?;
    GridSize::validated(size.width, size.height)
}

fn parse_index(text: &str) -> MazeResult<usize> {
    text.trim()
        .parse()
        .map_err(|_| parse_failed(format!("'{text}' is not a cell index")))
}

/// Link a cell to every listed target, skipping edges that already exist
fn link_all(graph: &mut MazeGraph, cell: usize, targets: &[usize]) -> MazeResult<()> {
    for &target in targets {
        if !graph.are_linked(cell, target) {
            graph.link(cell, target)?;
        }
    }
    Ok(())
}

fn parse_entry(entry: &str, separator: char) -> MazeResult<(usize, Vec<usize>)> {
    let (cell, links) = entry
        .split_once(':')
        .ok_or_else(|| parse_failed(format!("cell entry '{entry}' is missing ':'")))?;
    let targets = links
        .split(separator)
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .map(parse_index)
        .collect::<MazeResult<Vec<_>>>()?;
    Ok((parse_index(cell)?, targets))
}

fn parse_sectioned(text: &str) -> MazeResult<MazeGraph> {
    let sections: Vec<&str> = text.split('|').collect();
    if sections.len() > 3 {
        return Err(parse_failed(format!(
            "expected at most 3 '|' separated sections, found {}",
            sections.len()
        )));
    }

    let size = parse_size(sections[0])?;
    let zones = match sections.get(1) {
        Some(zones) => parse_zone_list(zones)?,
        None => Vec::new(),
    };
    let mut graph = MazeGraph::new(size, zones)?;

    if let Some(cells) = sections.get(2) {
        for entry in cells
            .split([',', ';'])
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
        {
            let (cell, targets) = parse_entry(entry, ' ')?;
            link_all(&mut graph, cell, &targets)?;
        }
    }
    Ok(graph)
}

fn parse_legacy(text: &str) -> MazeResult<MazeGraph> {
    let mut entries = text.split(';').map(str::trim);
    let size = parse_size(entries.next().unwrap_or_default())?;
    let mut graph = MazeGraph::new(size, Vec::new())?;

    for entry in entries.filter(|entry| !entry.is_empty()) {
        let (cell, targets) = parse_entry(entry, ',')?;
        link_all(&mut graph, cell, &targets)?;
    }
    Ok(graph)
}

impl fmt::Display for MazeGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for MazeGraph {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MazeGraph::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Position, Zone, ZoneType};

    const SCENARIO: &str = "3x3;0:3;1:2,4;2:5;3:4;4:7;6:7;7:8";

    #[test]
    fn test_parse_legacy_scenario() {
        let graph = MazeGraph::parse(SCENARIO).unwrap();
        assert_eq!(graph.size(), GridSize::new(3, 3));
        assert_eq!(graph.edge_count(), 8);
        assert!(graph.are_linked(0, 3));
        assert!(graph.are_linked(4, 1));
        assert!(graph.are_linked(8, 7));
        assert!(!graph.are_linked(0, 1));
        assert_eq!(graph.serialize(), "3x3||0:3,1:2 4,2:5,3:4,4:7,6:7,7:8");
    }

    #[test]
    fn test_round_trip_with_zones() {
        let zones = vec![
            Zone::new(ZoneType::Hall, Position::new(1, 1), GridSize::new(2, 2)),
            Zone::new(ZoneType::Fill, Position::new(0, 3), GridSize::new(1, 1))
                .with_tags(["rock"])
                .unwrap(),
        ];
        let mut graph = MazeGraph::new(GridSize::new(4, 4), zones).unwrap();
        graph.link(0, 1).unwrap();
        graph.link(1, 5).unwrap();
        graph.link(5, 6).unwrap();
        graph.link(15, 14).unwrap();

        let text = graph.serialize();
        assert_eq!(
            text,
            "4x4|P1x1;S2x2;Hall,P0x3;S1x1;Fill;rock|0:1,1:5,5:6,14:15"
        );

        let parsed: MazeGraph = text.parse().unwrap();
        assert_eq!(parsed, graph);
        assert_eq!(parsed.to_string(), text);
        for (original, copy) in graph.cells().iter().zip(parsed.cells()) {
            assert_eq!(original.position, copy.position);
            assert_eq!(original.links(), copy.links());
            assert_eq!(original.zones(), copy.zones());
            assert_eq!(original.is_excluded(), copy.is_excluded());
        }
    }

    #[test]
    fn test_duplicate_edges_ignored() {
        let graph = MazeGraph::parse("2x2||0:1,1:0 3;3:1").unwrap();
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            MazeGraph::parse("3x3||0:4"),
            Err(MazeError::NotAdjacent { .. })
        ));
        assert!(matches!(
            MazeGraph::parse("3x3||0-1"),
            Err(MazeError::ParseFailed { .. })
        ));
        assert!(matches!(
            MazeGraph::parse("0x3||"),
            Err(MazeError::InvalidSize { .. })
        ));
        assert!(MazeGraph::parse("3x3|P0x0;Q1x1;Hall|").is_err());
        assert!(MazeGraph::parse("3x3|||").is_err());
        assert!(MazeGraph::parse("3x3;0:a").is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range_geometry() {
        assert!(matches!(
            MazeGraph::parse("2147483647x2147483647||"),
            Err(MazeError::InvalidSize { .. })
        ));
        assert!(matches!(
            MazeGraph::parse("70000x70000"),
            Err(MazeError::InvalidSize { .. })
        ));
        assert!(matches!(
            MazeGraph::parse("3x3|P2147483647x0;S2x1;Fill|"),
            Err(MazeError::InvalidZone { .. })
        ));
        assert!(matches!(
            MazeGraph::parse("2x2|P0x0;S1x1;Cave;a,b|"),
            Err(MazeError::InvalidZone { .. })
        ));

        // Zones reaching past the grid only claim the cells inside it
        let graph = MazeGraph::parse("3x3|P1x1;S2147483646x5;Cave|").unwrap();
        assert_eq!(graph.zone_cells(0), &[4, 5, 7, 8]);
        assert_eq!(MazeGraph::parse(&graph.serialize()).unwrap(), graph);
    }

    #[test]
    fn test_tagged_zones_round_trip() {
        let zone = Zone::new(ZoneType::Cave, Position::new(0, 0), GridSize::new(2, 1))
            .with_tags(["flooded cave", "depth:3"])
            .unwrap();
        let graph = MazeGraph::new(GridSize::new(2, 2), vec![zone]).unwrap();
        let text = graph.serialize();
        assert_eq!(text, "2x2|P0x0;S2x1;Cave;flooded cave;depth:3|");
        assert_eq!(MazeGraph::parse(&text).unwrap(), graph);
    }

    #[test]
    fn test_empty_maze_text() {
        let graph = MazeGraph::new(GridSize::new(2, 3), Vec::new()).unwrap();
        assert_eq!(graph.serialize(), "2x3||");
        assert_eq!(MazeGraph::parse("2x3").unwrap(), graph);
    }
}
