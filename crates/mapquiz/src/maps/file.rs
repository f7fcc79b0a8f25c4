//! TOML map files.
//!
//! ```toml
//! id = "ghana"
//! title = "Regions of Ghana"
//!
//! [[regions]]
//! id = "ashanti"
//! name = "Ashanti"
//! description = "Kumasi"
//! row = 3
//! col = 1
//! ```
//!
//! `row` and `col` are optional. If any region lacks them the whole map is
//! laid out in reading order.

use std::path::Path;

use derive_getters::Getters;
use mapquiz_core::{Region, RegionId, RegionMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::maps::{GridCell, GridLayout, MapLoadError, QuizMap};

/// One region entry of a map file.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct RegionEntry {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    row: Option<u16>,
    #[serde(default)]
    col: Option<u16>,
}

/// A map file as written on disk.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MapFile {
    id: String,
    title: String,
    #[serde(default)]
    regions: Vec<RegionEntry>,
}

impl MapFile {
    /// Reads and parses a map file.
    ///
    /// # Errors
    ///
    /// Returns [`MapLoadError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MapLoadError> {
        debug!("Reading map file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            MapLoadError::new(format!(
                "Failed to read map file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Parses map TOML.
    ///
    /// # Errors
    ///
    /// Returns [`MapLoadError`] if the text is not a valid map file.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, MapLoadError> {
        let file: Self = toml::from_str(content)
            .map_err(|e| MapLoadError::new(format!("Failed to parse map file: {}", e)))?;
        info!(map_id = %file.id, regions = file.regions.len(), "Map file parsed");
        Ok(file)
    }

    /// Validates the regions and builds the layout.
    ///
    /// # Errors
    ///
    /// Returns [`MapLoadError`] if the regions do not form a valid map, two
    /// regions claim the same grid cell, or a position is off the grid.
    #[instrument(skip(self), fields(map_id = %self.id))]
    pub fn into_quiz_map(self) -> Result<QuizMap, MapLoadError> {
        let positions: Option<Vec<(RegionId, GridCell)>> = self
            .regions
            .iter()
            .map(|entry| {
                let (row, col) = (entry.row?, entry.col?);
                Some((RegionId::new(entry.id.clone()), GridCell { row, col }))
            })
            .collect();

        let regions = self
            .regions
            .into_iter()
            .map(|entry| {
                let region = Region::new(entry.id, entry.name);
                match entry.description {
                    Some(description) => region.with_description(description),
                    None => region,
                }
            })
            .collect();
        let map = RegionMap::new(self.id, self.title, regions)?;

        let layout = match positions {
            Some(positions) if !positions.is_empty() => GridLayout::from_positions(positions)?,
            _ => {
                if !map.is_empty() {
                    warn!("Map file has regions without a grid position; using reading order");
                }
                GridLayout::reading_order(&map)
            }
        };

        Ok(QuizMap::new(map, layout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_are_used_when_complete() {
        let toml = r#"
            id = "tiny"
            title = "Tiny"

            [[regions]]
            id = "north"
            name = "North"
            row = 0
            col = 1

            [[regions]]
            id = "south"
            name = "South"
            description = "Port"
            row = 1
            col = 0
        "#;
        let quiz_map = MapFile::from_toml(toml).unwrap().into_quiz_map().unwrap();
        assert_eq!(
            quiz_map.layout().region_at(0, 1),
            Some(&RegionId::new("north"))
        );
        let south = quiz_map.map().get(&RegionId::new("south")).unwrap();
        assert_eq!(south.description().as_deref(), Some("Port"));
    }

    #[test]
    fn test_missing_position_falls_back_to_reading_order() {
        let toml = r#"
            id = "tiny"
            title = "Tiny"

            [[regions]]
            id = "north"
            name = "North"
            row = 5
            col = 5

            [[regions]]
            id = "south"
            name = "South"
        "#;
        let quiz_map = MapFile::from_toml(toml).unwrap().into_quiz_map().unwrap();
        assert_eq!(
            quiz_map.layout().region_at(0, 0),
            Some(&RegionId::new("north"))
        );
    }

    #[test]
    fn test_position_at_u16_limit_is_rejected() {
        let toml = r#"
            id = "far"
            title = "Far"

            [[regions]]
            id = "edge"
            name = "Edge"
            row = 65535
            col = 0
        "#;
        let err = MapFile::from_toml(toml)
            .unwrap()
            .into_quiz_map()
            .unwrap_err();
        assert!(err.message.contains("off the grid"), "{}", err.message);
    }

    #[test]
    fn test_shared_cell_in_file_is_rejected() {
        let toml = r#"
            id = "clash"
            title = "Clash"

            [[regions]]
            id = "north"
            name = "North"
            row = 0
            col = 0

            [[regions]]
            id = "south"
            name = "South"
            row = 0
            col = 0
        "#;
        assert!(MapFile::from_toml(toml).unwrap().into_quiz_map().is_err());
    }

    #[test]
    fn test_ambiguous_names_are_rejected() {
        let toml = r#"
            id = "dup"
            title = "Dup"

            [[regions]]
            id = "a"
            name = "Cross River"

            [[regions]]
            id = "b"
            name = "cross-river state"
        "#;
        let result = MapFile::from_toml(toml).unwrap().into_quiz_map();
        assert!(result.is_err());
    }
}
