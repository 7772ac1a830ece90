use crate::domain::model::{Building, Floor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingRole {
    Primary,
    Annexe,
    Carport,
}

impl BuildingRole {
    pub fn from_usage_code(code: i64) -> Option<Self> {
        match code {
            510 => Some(BuildingRole::Primary),
            910 | 920 => Some(BuildingRole::Carport),
            585 | 930 => Some(BuildingRole::Annexe),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedBuildings<'a> {
    pub primary: Option<&'a Building>,
    pub annexe: Option<&'a Building>,
    pub carport: Option<&'a Building>,
}

/// Assigns buildings to roles by usage code. The whole list is scanned and a
/// later building replaces an earlier one of the same role, so each role
/// ends up holding the last match in input order.
pub fn classify(buildings: &[Building]) -> ClassifiedBuildings<'_> {
    let mut classified = ClassifiedBuildings::default();

    for building in buildings {
        match BuildingRole::from_usage_code(building.usage_code) {
            Some(BuildingRole::Primary) => classified.primary = Some(building),
            Some(BuildingRole::Annexe) => classified.annexe = Some(building),
            Some(BuildingRole::Carport) => classified.carport = Some(building),
            None => tracing::debug!(
                "Ignoring building {} with usage code {}",
                building.id,
                building.usage_code
            ),
        }
    }

    classified
}

/// First building whose building number is "1".
pub fn find_main_building(buildings: &[Building]) -> Option<&Building> {
    buildings
        .iter()
        .find(|b| b.number.as_deref().map(str::trim) == Some("1"))
}

/// Area of the first basement floor, zero when there is none.
pub fn basement_area(floors: &[Floor]) -> i64 {
    floors
        .iter()
        .find(|f| f.is_basement())
        .and_then(|f| f.total_area)
        .unwrap_or(0)
}
