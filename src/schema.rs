// Deep comps XML schema: maps a GetDeepComps response document onto typed records

use std::{fmt::Display, str::FromStr};

use chrono::NaiveDate;
use quick_xml::de::{from_str, DeError};
use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

// Error types for XML mapping
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Response body is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] DeError),
}

// Parsed comparables response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Response {
    pub request: Request,
    pub message: Message,
    pub principal: Property,
    pub comparables: Vec<Property>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Request {
    #[serde(default, deserialize_with = "lenient_number")]
    pub zpid: u64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Message {
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub code: i32,
}

impl Message {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// A principal or comparable property.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Property {
    pub score: f64,
    pub zpid: u64,
    pub home_details_url: String,
    pub graphs_and_data_url: String,
    pub map_this_home_url: String,
    pub comparables_url: String,
    pub address: Address,
    pub tax_assessment_year: i32,
    pub tax_assessment: f64,
    pub finished_sq_ft: u32,
    pub bathrooms: f64,
    pub bedrooms: u32,
    pub rent: RentInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RentInfo {
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: i64,
    #[serde(rename(deserialize = "@amount"), default)]
    pub currency: String,
    #[serde(rename(deserialize = "last-updated"), default)]
    pub last_updated: String,
}

impl RentInfo {
    /// Interprets `last_updated` as an `MM/DD/YYYY` date.
    pub fn last_updated_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.last_updated.trim(), "%m/%d/%Y").ok()
    }
}

// Wire layer: mirrors the document nesting and is flattened into `Response`.
// The root element name (`comps`, usually namespace-prefixed) is not checked.
#[derive(Debug, Default, Deserialize)]
struct WireComps {
    #[serde(default)]
    request: Request,
    #[serde(default)]
    message: Message,
    #[serde(default)]
    response: WireBody,
}

#[derive(Debug, Default, Deserialize)]
struct WireBody {
    #[serde(default)]
    properties: WireProperties,
}

#[derive(Debug, Default, Deserialize)]
struct WireProperties {
    #[serde(default)]
    principal: WireProperty,
    #[serde(default)]
    comparables: WireComparables,
}

#[derive(Debug, Default, Deserialize)]
struct WireComparables {
    #[serde(default)]
    comp: Vec<WireProperty>,
}

#[derive(Debug, Default, Deserialize)]
struct WireLinks {
    #[serde(default)]
    homedetails: String,
}

#[derive(Debug, Default, Deserialize)]
struct WireProperty {
    // Attribute only; a child <score> element is never read
    #[serde(rename = "@score", default, deserialize_with = "lenient_number")]
    score: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    zpid: u64,
    #[serde(default)]
    links: WireLinks,
    #[serde(default)]
    graphsanddata: String,
    // Element name as published by the service
    #[serde(default)]
    maothishome: String,
    #[serde(default)]
    comparables: String,
    #[serde(default)]
    address: Address,
    #[serde(rename = "taxAssessmentYear", default, deserialize_with = "lenient_number")]
    tax_assessment_year: i32,
    #[serde(rename = "taxAssessment", default, deserialize_with = "lenient_number")]
    tax_assessment: f64,
    #[serde(rename = "finishedSqFt", default, deserialize_with = "lenient_number")]
    finished_sq_ft: u32,
    #[serde(default, deserialize_with = "lenient_number")]
    bathrooms: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    bedrooms: u32,
    #[serde(default)]
    rentzestimate: RentInfo,
}

impl From<WireProperty> for Property {
    fn from(wire: WireProperty) -> Self {
        Self {
            score: wire.score,
            zpid: wire.zpid,
            home_details_url: wire.links.homedetails,
            graphs_and_data_url: wire.graphsanddata,
            map_this_home_url: wire.maothishome,
            comparables_url: wire.comparables,
            address: wire.address,
            tax_assessment_year: wire.tax_assessment_year,
            tax_assessment: wire.tax_assessment,
            finished_sq_ft: wire.finished_sq_ft,
            bathrooms: wire.bathrooms,
            bedrooms: wire.bedrooms,
            rent: wire.rentzestimate,
        }
    }
}

impl From<WireComps> for Response {
    fn from(wire: WireComps) -> Self {
        let WireProperties {
            principal,
            comparables,
        } = wire.response.properties;

        Self {
            request: wire.request,
            message: wire.message,
            principal: principal.into(),
            comparables: comparables.comp.into_iter().map(Property::from).collect(),
        }
    }
}

// Empty or whitespace-only values map to zero, anything else must parse
fn lenient_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: Display,
{
    let raw = String::deserialize(deserializer)?;
    let value = raw.trim();
    if value.is_empty() {
        return Ok(T::default());
    }

    value
        .parse::<T>()
        .map_err(|e| de::Error::custom(format!("invalid number {value:?}: {e}")))
}

/// Maps a deep comps XML document onto a [`Response`].
pub fn parse_response(xml: &[u8]) -> Result<Response, ParseError> {
    let text = std::str::from_utf8(xml)?;
    let wire: WireComps = from_str(text)?;

    Ok(wire.into())
}
