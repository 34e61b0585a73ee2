// Fetch -> parse -> validate

use thiserror::Error;
use tracing::debug;

use crate::{
    client::{ComparablesSource, CompsQuery, FetchError},
    schema::{parse_response, ParseError, Response},
    validate::{validate_response, ValidationError},
};

#[derive(Error, Debug)]
pub enum LookupError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl LookupError {
    /// The parsed response, when the failure happened after parsing.
    pub fn into_response(self) -> Option<Response> {
        match self {
            LookupError::Validation(e) => Some(e.into_response()),
            _ => None,
        }
    }
}

pub async fn lookup<S>(source: &S, query: &CompsQuery) -> Result<Response, LookupError>
where
    S: ComparablesSource + ?Sized,
{
    let body = source.fetch(query).await?;
    let response = parse_response(&body)?;
    debug!(
        comparables = response.comparables.len(),
        "Parsed comparables response"
    );

    Ok(validate_response(response)?)
}
