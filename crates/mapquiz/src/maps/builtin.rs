//! The built-in map: the 36 states of Nigeria.

use mapquiz_core::{Region, RegionId, RegionMap};
use tracing::instrument;

use crate::maps::{GridCell, GridLayout, MapLoadError, QuizMap};

/// Id of the built-in map.
pub const BUILTIN_MAP_ID: &str = "nigeria";

// (id, name, capital, row, col), roughly north to south, west to east.
const STATES: [(&str, &str, &str, u16, u16); 36] = [
    ("sokoto", "Sokoto", "Sokoto", 0, 0),
    ("zamfara", "Zamfara", "Gusau", 0, 1),
    ("katsina", "Katsina", "Katsina", 0, 2),
    ("kano", "Kano", "Kano", 0, 3),
    ("jigawa", "Jigawa", "Dutse", 0, 4),
    ("yobe", "Yobe", "Damaturu", 0, 5),
    ("borno", "Borno", "Maiduguri", 0, 6),
    ("kebbi", "Kebbi", "Birnin Kebbi", 1, 0),
    ("niger", "Niger", "Minna", 1, 1),
    ("kaduna", "Kaduna", "Kaduna", 1, 2),
    ("bauchi", "Bauchi", "Bauchi", 1, 3),
    ("gombe", "Gombe", "Gombe", 1, 4),
    ("adamawa", "Adamawa", "Yola", 1, 5),
    ("kwara", "Kwara", "Ilorin", 2, 0),
    ("kogi", "Kogi", "Lokoja", 2, 1),
    ("nasarawa", "Nasarawa", "Lafia", 2, 2),
    ("plateau", "Plateau", "Jos", 2, 3),
    ("taraba", "Taraba", "Jalingo", 2, 4),
    ("benue", "Benue", "Makurdi", 2, 5),
    ("oyo", "Oyo", "Ibadan", 3, 0),
    ("osun", "Osun", "Osogbo", 3, 1),
    ("ekiti", "Ekiti", "Ado-Ekiti", 3, 2),
    ("edo", "Edo", "Benin City", 3, 3),
    ("enugu", "Enugu", "Enugu", 3, 4),
    ("ebonyi", "Ebonyi", "Abakaliki", 3, 5),
    ("cross_river", "Cross River", "Calabar", 3, 6),
    ("ogun", "Ogun", "Abeokuta", 4, 0),
    ("ondo", "Ondo", "Akure", 4, 1),
    ("delta", "Delta", "Asaba", 4, 2),
    ("anambra", "Anambra", "Awka", 4, 3),
    ("imo", "Imo", "Owerri", 4, 4),
    ("abia", "Abia", "Umuahia", 4, 5),
    ("akwa_ibom", "Akwa Ibom", "Uyo", 4, 6),
    ("lagos", "Lagos", "Ikeja", 5, 0),
    ("bayelsa", "Bayelsa", "Yenagoa", 5, 2),
    ("rivers", "Rivers", "Port Harcourt", 5, 3),
];

/// The states of Nigeria, each described by its capital.
///
/// # Errors
///
/// Returns [`MapLoadError`] if the built-in table is inconsistent.
#[instrument]
pub fn nigeria() -> Result<QuizMap, MapLoadError> {
    let regions = STATES
        .iter()
        .map(|(id, name, capital, _, _)| {
            Region::new(*id, *name).with_description(format!("Capital: {}", capital))
        })
        .collect();
    let map = RegionMap::new(BUILTIN_MAP_ID, "States of Nigeria", regions)?;

    let layout = GridLayout::from_positions(
        STATES
            .iter()
            .map(|(id, _, _, row, col)| (RegionId::new(*id), GridCell { row: *row, col: *col })),
    )?;

    Ok(QuizMap::new(map, layout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_map_has_every_state() {
        let quiz_map = nigeria().unwrap();
        assert_eq!(quiz_map.map().len(), 36);
        assert_eq!(quiz_map.layout().rows(), 6);
        assert_eq!(quiz_map.layout().cols(), 7);
        for region in quiz_map.map().regions() {
            assert!(quiz_map.layout().position(region.id()).is_some());
        }
    }

    #[test]
    fn test_builtin_map_accepts_state_suffix() {
        let quiz_map = nigeria().unwrap();
        let found = quiz_map.map().find_by_name("cross-river state").unwrap();
        assert_eq!(found.description().as_deref(), Some("Capital: Calabar"));
    }
}
