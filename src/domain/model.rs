use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Street/house-number range requested by an export command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressQuery {
    pub municipality_code: String,
    pub street_code: String,
    pub house_number_from: String,
    pub house_number_to: String,
}

impl AddressQuery {
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("kommunekode", self.municipality_code.clone()),
            ("vejkode", self.street_code.clone()),
            ("husnrfra", self.house_number_from.clone()),
            ("husnrtil", self.house_number_to.clone()),
            ("struktur", "flad".to_string()),
        ]
    }
}

/// Access address in the flat structure returned by `adgangsadresser`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: String,
    #[serde(rename = "vejnavn")]
    pub street_name: String,
    #[serde(rename = "husnr")]
    pub house_number: String,
    /// Empty when the registry has no owner reference for the address.
    #[serde(
        rename = "esrejendomsnr",
        default,
        deserialize_with = "lenient_string_or_empty"
    )]
    pub owner_reference: String,
    #[serde(rename = "ejerlavkode", deserialize_with = "lenient_string")]
    pub registry_area_code: String,
    #[serde(rename = "matrikelnr")]
    pub parcel_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    #[serde(rename = "Bygning_id", deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(
        rename = "Bygningsnr",
        default,
        deserialize_with = "lenient_opt_string"
    )]
    pub number: Option<String>,
    #[serde(rename = "BYG_ANVEND_KODE", deserialize_with = "lenient_i64")]
    pub usage_code: i64,
    #[serde(rename = "OPFOERELSE_AAR", default, deserialize_with = "lenient_opt_i64")]
    pub construction_year: Option<i64>,
    #[serde(rename = "OMBYG_AAR", default, deserialize_with = "lenient_opt_i64")]
    pub renovation_year: Option<i64>,
    #[serde(rename = "BYG_BEBYG_ARL", default, deserialize_with = "lenient_opt_i64")]
    pub built_area: Option<i64>,
    #[serde(
        rename = "BYG_BOLIG_ARL_SAML",
        default,
        deserialize_with = "lenient_opt_i64"
    )]
    pub living_area: Option<i64>,
}

pub const BASEMENT_MARKER: &str = "KL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    #[serde(rename = "Etagebetegn", default, deserialize_with = "lenient_opt_string")]
    pub designation: Option<String>,
    #[serde(rename = "SamletAreal", default, deserialize_with = "lenient_opt_i64")]
    pub total_area: Option<i64>,
}

impl Floor {
    pub fn is_basement(&self) -> bool {
        self.designation.as_deref().map(str::trim) == Some(BASEMENT_MARKER)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandParcel {
    #[serde(rename = "registreretareal", deserialize_with = "lenient_i64")]
    pub registered_area: i64,
}

/// Ownership details scraped from the public ownership page. Every field may
/// be missing; that is a normal outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipFact {
    pub deed_date: Option<NaiveDate>,
    pub sale_date: Option<NaiveDate>,
    pub sale_price: Option<i64>,
}

impl OwnershipFact {
    pub fn is_empty(&self) -> bool {
        self.deed_date.is_none() && self.sale_date.is_none() && self.sale_price.is_none()
    }
}

/// Buildings picked for one address by an export variant.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingSelection {
    pub primary: Building,
    pub annexe: Option<Building>,
    pub carport: Option<Building>,
}

/// One fully resolved address, ready to be turned into report cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub address: Address,
    pub buildings: BuildingSelection,
    pub basement_area: i64,
    pub land: LandParcel,
    pub ownership: OwnershipFact,
}

impl ExportRow {
    pub fn address_id(&self) -> &str {
        &self.address.id
    }
}

// The registry has served the same fields both as JSON numbers and as
// numeric strings, so the DTOs accept either.

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Text(String),
}

impl NumberOrString {
    fn into_i64(self) -> Option<i64> {
        match self {
            NumberOrString::Int(n) => Some(n),
            NumberOrString::Float(f) if f.fract() == 0.0 => Some(f as i64),
            NumberOrString::Float(_) => None,
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }
    }

    fn into_string(self) -> String {
        match self {
            NumberOrString::Int(n) => n.to_string(),
            NumberOrString::Float(f) => f.to_string(),
            NumberOrString::Text(s) => s,
        }
    }
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    NumberOrString::deserialize(deserializer)?
        .into_i64()
        .ok_or_else(|| serde::de::Error::custom("expected an integer"))
}

fn lenient_opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(Option::<NumberOrString>::deserialize(deserializer)?.and_then(NumberOrString::into_i64))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(NumberOrString::deserialize(deserializer)?.into_string())
}

fn lenient_string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<NumberOrString>::deserialize(deserializer)?.map(NumberOrString::into_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_building_accepts_numbers_and_numeric_strings() {
        let building: Building = serde_json::from_value(json!({
            "Bygning_id": "b-1",
            "Bygningsnr": 1,
            "BYG_ANVEND_KODE": "510",
            "OPFOERELSE_AAR": 1950,
            "OMBYG_AAR": null,
            "BYG_BOLIG_ARL_SAML": "120"
        }))
        .unwrap();

        assert_eq!(building.number.as_deref(), Some("1"));
        assert_eq!(building.usage_code, 510);
        assert_eq!(building.construction_year, Some(1950));
        assert_eq!(building.renovation_year, None);
        assert_eq!(building.built_area, None);
        assert_eq!(building.living_area, Some(120));
    }

    #[test]
    fn test_building_without_usage_code_is_rejected() {
        let result = serde_json::from_value::<Building>(json!({"Bygning_id": "b-1"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_flat_address_fields() {
        let address: Address = serde_json::from_value(json!({
            "id": "0a3f5089-1",
            "vejnavn": "Rådhuspladsen",
            "husnr": "1",
            "esrejendomsnr": 123456,
            "ejerlavkode": 2000175,
            "matrikelnr": "1a",
            "postnr": "1550"
        }))
        .unwrap();

        assert_eq!(address.street_name, "Rådhuspladsen");
        assert_eq!(address.owner_reference, "123456");
        assert_eq!(address.registry_area_code, "2000175");
        assert_eq!(address.parcel_number, "1a");
    }

    #[test]
    fn test_address_without_owner_reference() {
        let address: Address = serde_json::from_value(json!({
            "id": "a-2",
            "vejnavn": "Torvet",
            "husnr": "2",
            "esrejendomsnr": null,
            "ejerlavkode": "40",
            "matrikelnr": "5"
        }))
        .unwrap();
        assert_eq!(address.owner_reference, "");
    }

    #[test]
    fn test_basement_marker() {
        let floor = Floor {
            designation: Some("KL".to_string()),
            total_area: Some(30),
        };
        assert!(floor.is_basement());

        let ground = Floor {
            designation: Some("ST".to_string()),
            total_area: Some(80),
        };
        assert!(!ground.is_basement());
    }
}
