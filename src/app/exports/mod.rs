//! Report variants. Each variant decides which buildings of an address it
//! reports on and how a resolved row is laid out as cells.

pub mod bbr_data;
pub mod vacation_house;

pub use bbr_data::BbrDataExport;
pub use vacation_house::VacationHouseExport;

use crate::domain::model::{Building, BuildingSelection, ExportRow};

pub trait ExportVariant: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` means the address has no reportable building and is skipped.
    fn select_buildings(&self, buildings: &[Building]) -> Option<BuildingSelection>;

    fn headers(&self) -> &'static [&'static str];

    fn cells(&self, row: &ExportRow) -> Vec<String>;
}

pub(crate) fn optional_number(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
