use super::{optional_number, ExportVariant};
use crate::core::classifier::{classify, find_main_building};
use crate::core::ownership::format_date;
use crate::domain::model::{Building, BuildingSelection, ExportRow};

const HEADERS: &[&str] = &[
    "Street Name",
    "House No",
    "Construction Year",
    "Total Living Area",
    "Total Basement Area",
    "Total Ground Area",
    "Deed Date",
    "Sales Price",
    "Sales Date",
];

/// General building report: one main building per address.
#[derive(Debug, Clone, Copy, Default)]
pub struct BbrDataExport;

impl ExportVariant for BbrDataExport {
    fn name(&self) -> &'static str {
        "bbr-data"
    }

    /// Building number "1" first. Without one, the dwelling picked by usage
    /// code stands in; with neither the address is skipped.
    fn select_buildings(&self, buildings: &[Building]) -> Option<BuildingSelection> {
        let primary = find_main_building(buildings).or_else(|| {
            let fallback = classify(buildings).primary;
            if let Some(b) = fallback {
                tracing::debug!("No building number 1, using dwelling {} instead", b.id);
            }
            fallback
        })?;

        Some(BuildingSelection {
            primary: primary.clone(),
            annexe: None,
            carport: None,
        })
    }

    fn headers(&self) -> &'static [&'static str] {
        HEADERS
    }

    fn cells(&self, row: &ExportRow) -> Vec<String> {
        let primary = &row.buildings.primary;
        vec![
            row.address.street_name.clone(),
            row.address.house_number.clone(),
            optional_number(primary.construction_year),
            optional_number(primary.living_area),
            row.basement_area.to_string(),
            row.land.registered_area.to_string(),
            format_date(row.ownership.deed_date),
            row.ownership.sale_price.unwrap_or(0).to_string(),
            format_date(row.ownership.sale_date),
        ]
    }
}
