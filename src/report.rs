// Listing output and distance-matrix URL construction

use std::{
    fmt,
    io::{self, Write},
};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;
use url::Url;

use crate::{
    client::endpoint_url,
    config::MapsConfig,
    schema::{Address, Property, Response},
};

const DISTANCE_MATRIX_PATH: &str = "maps/api/distancematrix/json";

// Path-segment escaping: unreserved characters and `$&+:=@` pass through,
// so `,` becomes %2C and `|` becomes %7C
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

// Query values also need `&`, `=` and `+` escaped
const QUERY_VALUE: &AsciiSet = &PATH_SEGMENT.add(b'&').add(b'=').add(b'+');

#[derive(Error, Debug)]
pub enum UrlError {
    #[error("Invalid maps base URL {0}")]
    InvalidBaseUrl(String),
}

/// One listing line: score, zpid, rent, street, bedrooms, bathrooms, square feet.
pub struct ListingLine<'a>(pub &'a Property);

impl fmt::Display for ListingLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        write!(
            f,
            "{},{},${},{},{},{},{}",
            p.score,
            p.zpid,
            p.rent.amount,
            p.address.street,
            p.bedrooms,
            p.bathrooms,
            p.finished_sq_ft
        )
    }
}

pub fn write_listing<W: Write>(out: &mut W, comparables: &[Property]) -> io::Result<()> {
    for property in comparables {
        writeln!(out, "{}", ListingLine(property))?;
    }
    Ok(())
}

pub fn write_listing_json<W: Write>(out: &mut W, comparables: &[Property]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, comparables)?;
    writeln!(out)
}

pub fn coordinate_pair(address: &Address) -> String {
    format!("{},{}", address.latitude, address.longitude)
}

fn path_escape(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

fn query_escape(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Distance-matrix URL from the principal to every comparable, in response order.
pub fn distance_matrix_url(response: &Response, maps: &MapsConfig) -> Result<Url, UrlError> {
    let origin = coordinate_pair(&response.principal.address);
    let destinations = response
        .comparables
        .iter()
        .map(|p| coordinate_pair(&p.address))
        .collect::<Vec<_>>()
        .join("|");

    let mut url = endpoint_url(&maps.base_url, DISTANCE_MATRIX_PATH)
        .map_err(|e| UrlError::InvalidBaseUrl(format!("{:?}: {e}", maps.base_url)))?;

    url.set_query(Some(&format!(
        "units=imperial&origins={}&destinations={}&key={}",
        path_escape(&origin),
        path_escape(&destinations),
        query_escape(&maps.api_key)
    )));

    Ok(url)
}
