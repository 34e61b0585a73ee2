// Response validation: the principal must be the property that was requested

use thiserror::Error;
use tracing::{info, warn};

use crate::schema::Response;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("identifier mismatch between request and principal (request {requested}, principal {principal})")]
    IdentifierMismatch {
        requested: u64,
        principal: u64,
        response: Box<Response>,
    },
}

impl ValidationError {
    /// Hands back the parsed response so callers can still use it.
    pub fn into_response(self) -> Response {
        match self {
            ValidationError::IdentifierMismatch { response, .. } => *response,
        }
    }

    pub fn response(&self) -> &Response {
        match self {
            ValidationError::IdentifierMismatch { response, .. } => response,
        }
    }
}

pub fn validate_response(response: Response) -> Result<Response, ValidationError> {
    info!(zpid = response.request.zpid, "Info for ZPID: {}", response.request.zpid);
    info!(
        count = response.request.count,
        "Comps in response: {}", response.request.count
    );

    if !response.message.is_success() {
        warn!(
            code = response.message.code,
            "API message: {}", response.message.text
        );
    }

    let requested = response.request.zpid;
    let principal = response.principal.zpid;
    if requested != principal {
        return Err(ValidationError::IdentifierMismatch {
            requested,
            principal,
            response: Box::new(response),
        });
    }

    Ok(response)
}
