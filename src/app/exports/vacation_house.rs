use super::{optional_number, ExportVariant};
use crate::core::classifier::classify;
use crate::core::ownership::format_date;
use crate::domain::model::{Building, BuildingSelection, ExportRow};

const HEADERS: &[&str] = &[
    "Street Name",
    "House No",
    "Building Use Code",
    "Construction Year",
    "Rebuilt Year",
    "Total Living Area",
    "Total Basement Area",
    "Total Ground Area",
    "Annexe Area",
    "Annexe Construction Year",
    "Annexe Rebuilt Year",
    "Carport Area",
    "Carport Construction Year",
    "Carport Rebuilt Year",
    "Deed Date",
    "Sales Price",
    "Sales Date",
    "Cadastral Number",
];

/// Holiday home report: the dwelling plus its annexe and carport, classified
/// by usage code.
#[derive(Debug, Clone, Copy, Default)]
pub struct VacationHouseExport;

impl ExportVariant for VacationHouseExport {
    fn name(&self) -> &'static str {
        "vacation-house"
    }

    fn select_buildings(&self, buildings: &[Building]) -> Option<BuildingSelection> {
        let classified = classify(buildings);
        Some(BuildingSelection {
            primary: classified.primary?.clone(),
            annexe: classified.annexe.cloned(),
            carport: classified.carport.cloned(),
        })
    }

    fn headers(&self) -> &'static [&'static str] {
        HEADERS
    }

    fn cells(&self, row: &ExportRow) -> Vec<String> {
        let primary = &row.buildings.primary;
        let annexe = row.buildings.annexe.as_ref();
        let carport = row.buildings.carport.as_ref();

        vec![
            row.address.street_name.clone(),
            row.address.house_number.clone(),
            primary.usage_code.to_string(),
            optional_number(primary.construction_year),
            optional_number(primary.renovation_year),
            optional_number(primary.living_area),
            row.basement_area.to_string(),
            row.land.registered_area.to_string(),
            optional_number(annexe.and_then(|b| b.built_area)),
            optional_number(annexe.and_then(|b| b.construction_year)),
            optional_number(annexe.and_then(|b| b.renovation_year)),
            optional_number(carport.and_then(|b| b.built_area)),
            optional_number(carport.and_then(|b| b.construction_year)),
            optional_number(carport.and_then(|b| b.renovation_year)),
            format_date(row.ownership.deed_date),
            row.ownership.sale_price.unwrap_or(0).to_string(),
            format_date(row.ownership.sale_date),
            row.address.parcel_number.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Address, LandParcel, OwnershipFact};
    use chrono::NaiveDate;

    fn building(id: &str, usage_code: i64, built_area: i64, year: i64) -> Building {
        Building {
            id: id.to_string(),
            number: None,
            usage_code,
            construction_year: Some(year),
            renovation_year: None,
            built_area: Some(built_area),
            living_area: Some(built_area),
        }
    }

    #[test]
    fn test_requires_primary() {
        let buildings = vec![building("shed", 930, 12, 1990), building("carport", 910, 20, 2001)];
        assert!(VacationHouseExport.select_buildings(&buildings).is_none());
    }

    #[test]
    fn test_selection_keeps_last_building_per_role() {
        let buildings = vec![
            building("house-old", 510, 60, 1965),
            building("shed", 930, 12, 1990),
            building("house-new", 510, 85, 2005),
        ];
        let selection = VacationHouseExport.select_buildings(&buildings).unwrap();
        assert_eq!(selection.primary.id, "house-new");
        assert_eq!(selection.annexe.map(|b| b.id), Some("shed".to_string()));
        assert!(selection.carport.is_none());
    }

    #[test]
    fn test_cells_leave_missing_outbuildings_blank() {
        let mut primary = building("house", 510, 85, 1972);
        primary.renovation_year = Some(1999);

        let row = ExportRow {
            address: Address {
                id: "a-9".to_string(),
                street_name: "Klitvej".to_string(),
                house_number: "14".to_string(),
                owner_reference: "77".to_string(),
                registry_area_code: "1200".to_string(),
                parcel_number: "3ab".to_string(),
            },
            buildings: BuildingSelection {
                primary,
                annexe: None,
                carport: Some(building("carport", 920, 18, 2010)),
            },
            basement_area: 0,
            land: LandParcel {
                registered_area: 1200,
            },
            ownership: OwnershipFact {
                deed_date: None,
                sale_date: NaiveDate::from_ymd_opt(2019, 5, 2),
                sale_price: Some(1_800_000),
            },
        };

        let cells = VacationHouseExport.cells(&row);
        assert_eq!(cells.len(), VacationHouseExport.headers().len());
        assert_eq!(
            cells,
            vec![
                "Klitvej", "14", "510", "1972", "1999", "85", "0", "1200", "", "", "", "18",
                "2010", "", "", "1800000", "02-05-2019", "3ab",
            ]
        );
    }
}
