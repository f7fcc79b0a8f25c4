//! Map sources: the built-in map and TOML map files, with the grid layout
//! the terminal UI draws them on.

mod builtin;
mod file;

use std::collections::HashMap;
use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use mapquiz_core::{MapError, RegionId, RegionMap};
use tracing::{debug, info, instrument};

pub use builtin::{BUILTIN_MAP_ID, nigeria};
pub use file::{MapFile, RegionEntry};

/// A cell of the terminal map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Row, from the top.
    pub row: u16,
    /// Column, from the left.
    pub col: u16,
}

/// Where each region sits on the terminal map grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridLayout {
    cells: HashMap<RegionId, GridCell>,
    occupants: HashMap<GridCell, RegionId>,
    rows: u16,
    cols: u16,
}

impl GridLayout {
    /// Builds a layout from explicit positions.
    ///
    /// # Errors
    ///
    /// Returns [`MapLoadError`] if two regions share a cell or a cell lies on
    /// the last row or column a `u16` can address.
    #[instrument(skip(positions))]
    pub fn from_positions(
        positions: impl IntoIterator<Item = (RegionId, GridCell)>,
    ) -> Result<Self, MapLoadError> {
        let mut layout = Self::default();
        for (id, cell) in positions {
            let (Some(rows), Some(cols)) = (cell.row.checked_add(1), cell.col.checked_add(1))
            else {
                return Err(MapLoadError::new(format!(
                    "Region '{}' is placed off the grid at ({}, {})",
                    id, cell.row, cell.col
                )));
            };
            if let Some(other) = layout.occupants.insert(cell, id.clone()) {
                debug!(region = %id, row = cell.row, col = cell.col, "Grid cell already taken");
                return Err(MapLoadError::new(format!(
                    "Regions '{}' and '{}' share a grid cell",
                    other, id
                )));
            }
            layout.rows = layout.rows.max(rows);
            layout.cols = layout.cols.max(cols);
            layout.cells.insert(id, cell);
        }
        Ok(layout)
    }

    /// Lays the regions out in reading order on a near-square grid.
    #[instrument(skip(map), fields(map_id = %map.id()))]
    pub fn reading_order(map: &RegionMap) -> Self {
        let cols = (map.len() as f64).sqrt().ceil().max(1.0) as u16;
        let positions = map.regions().iter().enumerate().map(|(i, region)| {
            let i = i as u16;
            (
                region.id().clone(),
                GridCell {
                    row: i / cols,
                    col: i % cols,
                },
            )
        });
        // Reading order never places two regions in one cell.
        Self::from_positions(positions).unwrap_or_default()
    }

    /// Cell of a region.
    pub fn position(&self, id: &RegionId) -> Option<GridCell> {
        self.cells.get(id).copied()
    }

    /// Region drawn in a cell.
    pub fn region_at(&self, row: u16, col: u16) -> Option<&RegionId> {
        self.occupants.get(&GridCell { row, col })
    }

    /// Number of rows.
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u16 {
        self.cols
    }
}

/// A playable map with its layout.
#[derive(Debug, Clone, Getters)]
pub struct QuizMap {
    map: RegionMap,
    layout: GridLayout,
}

impl QuizMap {
    /// Pairs a map with its layout.
    pub fn new(map: RegionMap, layout: GridLayout) -> Self {
        Self { map, layout }
    }

    /// Splits into the map and its layout.
    pub fn into_parts(self) -> (RegionMap, GridLayout) {
        (self.map, self.layout)
    }
}

/// Loads the map at `path`, or the built-in map when no path is given.
///
/// # Errors
///
/// Returns [`MapLoadError`] if the file cannot be read, parsed or validated.
#[instrument(skip(path))]
pub fn load_map(path: Option<&Path>) -> Result<QuizMap, MapLoadError> {
    let quiz_map = match path {
        Some(path) => MapFile::from_file(path)?.into_quiz_map()?,
        None => nigeria()?,
    };
    info!(
        map_id = %quiz_map.map().id(),
        regions = quiz_map.map().len(),
        "Map loaded"
    );
    Ok(quiz_map)
}

/// Map loading error.
#[derive(Debug, Clone, Display, Error)]
#[display("Map error: {} at {}:{}", message, file, line)]
pub struct MapLoadError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl MapLoadError {
    /// Creates a new map loading error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<MapError> for MapLoadError {
    #[track_caller]
    fn from(err: MapError) -> Self {
        Self::new(format!("Invalid map: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapquiz_core::Region;

    #[test]
    fn test_reading_order_is_near_square() {
        let regions = (0..5)
            .map(|i| Region::new(format!("r{}", i), format!("Region {}", i)))
            .collect();
        let map = RegionMap::new("m", "M", regions).unwrap();
        let layout = GridLayout::reading_order(&map);
        assert_eq!(layout.cols(), 3);
        assert_eq!(layout.rows(), 2);
        assert_eq!(layout.region_at(1, 1), Some(&RegionId::new("r4")));
        assert_eq!(layout.region_at(1, 2), None);
    }

    #[test]
    fn test_shared_cell_is_rejected() {
        let cell = GridCell { row: 0, col: 0 };
        let err =
            GridLayout::from_positions([(RegionId::new("a"), cell), (RegionId::new("b"), cell)])
                .unwrap_err();
        assert!(err.message.contains("share a grid cell"));
    }

    #[test]
    fn test_last_addressable_cell_is_rejected() {
        let edge = GridCell {
            row: u16::MAX,
            col: 0,
        };
        assert!(GridLayout::from_positions([(RegionId::new("a"), edge)]).is_err());

        let inside = GridCell {
            row: u16::MAX - 1,
            col: 3,
        };
        let layout = GridLayout::from_positions([(RegionId::new("a"), inside)]).unwrap();
        assert_eq!(layout.rows(), u16::MAX);
        assert_eq!(layout.cols(), 4);
    }
}
