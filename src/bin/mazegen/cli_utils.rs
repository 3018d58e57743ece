use mazeforge::{GridSize, MazeError, MazeResult, Position};
use std::path::Path;
use std::str::FromStr;

/// Largest maze side accepted on the command line
pub const MAX_SIDE: i32 = 512;

/// Generic parser for delimited strings that return fixed-size arrays
pub fn parse_delimited<T, const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
) -> MazeResult<[T; N]>
where
    T: FromStr + Copy + Default,
{
    let parts: Vec<&str> = input.split(delimiter).collect();
    if parts.len() != N {
        return Err(MazeError::ParseFailed {
            reason: format!(
                "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
            ),
        });
    }

    let mut result = [T::default(); N];
    for (i, part) in parts.iter().enumerate() {
        result[i] = part.trim().parse().map_err(|_| MazeError::ParseFailed {
            reason: format!("Invalid {type_name} value: '{part}'"),
        })?;
    }

    Ok(result)
}

/// Parse size string "WIDTHxHEIGHT" with validation
pub fn parse_size(size_str: &str) -> MazeResult<GridSize> {
    let [width, height] = parse_delimited::<i32, 2>(size_str, 'x', "size")?;
    if width > MAX_SIDE || height > MAX_SIDE {
        return Err(MazeError::InvalidSize { width, height });
    }
    GridSize::validated(width, height)
}

/// Parse position string "X,Y"
pub fn parse_position(pos_str: &str) -> MazeResult<Position> {
    let [x, y] = parse_delimited::<i32, 2>(pos_str, ',', "position")?;
    Ok(Position::new(x, y))
}

/// Parse a route "X,Y:X,Y" into its start and end
pub fn parse_solve(route: &str) -> MazeResult<(Position, Position)> {
    let Some((start, end)) = route.split_once(':') else {
        return Err(MazeError::ParseFailed {
            reason: format!("Invalid route '{route}'. Expected X,Y:X,Y"),
        });
    };
    Ok((parse_position(start)?, parse_position(end)?))
}

pub fn validate_output_path(filename: &str) -> MazeResult<()> {
    let path = Path::new(filename);
    if path.is_absolute() {
        return Err(MazeError::InvalidMazeData {
            reason: format!(
                "Output path must be relative to the mazes/ directory, got absolute path: {filename}"
            ),
        });
    }

    if filename.contains("..") {
        return Err(MazeError::InvalidMazeData {
            reason: "Output path cannot contain '..'".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("64x64").unwrap(), GridSize::new(64, 64));
        assert_eq!(parse_size("12x30").unwrap(), GridSize::new(12, 30));
        assert_eq!(parse_size("1x1").unwrap(), GridSize::new(1, 1));

        assert!(parse_size("64").is_err());
        assert!(parse_size("axb").is_err());
        assert!(matches!(
            parse_size("0x64"),
            Err(MazeError::InvalidSize { .. })
        ));
        assert!(matches!(
            parse_size("600x64"),
            Err(MazeError::InvalidSize {
                width: 600,
                height: 64
            })
        ));
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("3,4").unwrap(), Position::new(3, 4));
        assert_eq!(parse_position(" 0, 7").unwrap(), Position::new(0, 7));

        assert!(parse_position("1,2,3").is_err());
        assert!(parse_position("x,y").is_err());
    }

    #[test]
    fn test_parse_solve() {
        assert_eq!(
            parse_solve("0,0:9,9").unwrap(),
            (Position::new(0, 0), Position::new(9, 9))
        );
        assert!(parse_solve("0,0").is_err());
        assert!(parse_solve("0,0:9").is_err());
    }

    #[test]
    fn test_validate_output_path() {
        assert!(validate_output_path("maze.bin").is_ok());
        assert!(validate_output_path("levels/crypt.bin").is_ok());
        assert!(validate_output_path("/tmp/maze.bin").is_err());
        assert!(validate_output_path("../maze.bin").is_err());
    }
}
