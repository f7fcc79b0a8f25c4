//! The set of regions a session is played over.

use std::collections::{HashMap, HashSet};

use derive_more::{Display, Error};
use tracing::{debug, instrument, warn};

use crate::matcher::normalize;
use crate::{Region, RegionId};

/// Why a list of regions cannot form a map.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MapError {
    /// Two regions share an id.
    #[display("Duplicate region id '{}'", _0)]
    DuplicateId(#[error(not(source))] RegionId),

    /// A region name is empty once normalized, so it could never be guessed.
    #[display("Region '{}' has no guessable name", _0)]
    UnguessableName(#[error(not(source))] RegionId),

    /// Two region names normalize to the same key, so a guess could match both.
    #[display("Regions '{}' and '{}' have indistinguishable names", first, second)]
    AmbiguousNames {
        /// Name of the earlier region.
        first: String,
        /// Name of the later region.
        second: String,
    },
}

/// An ordered, validated collection of regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMap {
    id: String,
    title: String,
    regions: Vec<Region>,
}

impl RegionMap {
    /// Builds a map, checking that ids are unique and names are guessable and
    /// distinguishable.
    ///
    /// An empty region list is accepted here; starting a session on it fails.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] describing the first offending region.
    #[instrument(skip(id, title, regions), fields(region_count = regions.len()))]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        regions: Vec<Region>,
    ) -> Result<Self, MapError> {
        let mut ids: HashSet<&RegionId> = HashSet::with_capacity(regions.len());
        let mut names: HashMap<String, &str> = HashMap::with_capacity(regions.len());

        for region in &regions {
            if !ids.insert(region.id()) {
                warn!(id = %region.id(), "Duplicate region id");
                return Err(MapError::DuplicateId(region.id().clone()));
            }

            let key = normalize(region.display_name());
            if key.is_empty() {
                return Err(MapError::UnguessableName(region.id().clone()));
            }
            if let Some(first) = names.insert(key.as_str().to_string(), region.display_name()) {
                return Err(MapError::AmbiguousNames {
                    first: first.to_string(),
                    second: region.display_name().clone(),
                });
            }
        }

        let map = Self {
            id: id.into(),
            title: title.into(),
            regions,
        };
        debug!(map_id = %map.id, "Region map built");
        Ok(map)
    }

    /// Short identifier, used as the persistence key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Regions in map order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns true if the map has no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Looks up a region by id.
    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id() == id)
    }

    /// Index of a region in map order.
    pub fn position(&self, id: &RegionId) -> Option<usize> {
        self.regions.iter().position(|r| r.id() == id)
    }

    /// Finds the region whose canonical name matches `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&Region> {
        let key = normalize(name);
        self.regions
            .iter()
            .find(|r| normalize(r.display_name()) == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = RegionMap::new(
            "m",
            "M",
            vec![Region::new("a", "Abia"), Region::new("a", "Adamawa")],
        );
        assert_eq!(result, Err(MapError::DuplicateId(RegionId::new("a"))));
    }

    #[test]
    fn test_rejects_names_that_normalize_together() {
        let result = RegionMap::new(
            "m",
            "M",
            vec![
                Region::new("cr1", "Cross River"),
                Region::new("cr2", "Cross-River State"),
            ],
        );
        assert!(matches!(result, Err(MapError::AmbiguousNames { .. })));
    }

    #[test]
    fn test_rejects_unguessable_name() {
        let result = RegionMap::new("m", "M", vec![Region::new("s", "State")]);
        assert_eq!(result, Err(MapError::UnguessableName(RegionId::new("s"))));
    }

    #[test]
    fn test_find_by_name_uses_matching_rules() {
        let map = RegionMap::new("m", "M", vec![Region::new("lagos", "Lagos")]).unwrap();
        assert_eq!(map.find_by_name("LAGOS state").map(|r| r.id().as_str()), Some("lagos"));
        assert!(map.find_by_name("Ogun").is_none());
    }
}
