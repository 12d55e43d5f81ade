use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
pub enum Gender {
    #[strum(serialize = "M")]
    #[serde(rename = "M")]
    Male,
    #[strum(serialize = "F")]
    #[serde(rename = "F")]
    Female,
    #[strum(serialize = "O")]
    #[serde(rename = "O")]
    Other,
}

impl Gender {
    pub const CODES: &'static [&'static str] = &["M", "F", "O"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Hobby {
    Football,
    TableTennis,
    Basketball,
}

impl Hobby {
    pub const CODES: &'static [&'static str] = &["football", "tableTennis", "basketball"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
pub enum Country {
    Nepal,
    India,
    #[strum(serialize = "USA")]
    #[serde(rename = "USA")]
    Usa,
}

impl Country {
    pub const CODES: &'static [&'static str] = &["Nepal", "India", "USA"];
}
