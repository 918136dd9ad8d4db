use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error querying database: {0}")]
    DBQueryError(#[from] diesel::result::Error),
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    #[error("unknown country: {0}")]
    UnknownCountry(String),
    #[error("unknown genre: {0}")]
    UnknownGenre(String),
}

/// Request-shape errors. The Display strings are the public 400 messages.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingRequiredFields,
    #[error("Invalid release_date format. Please use MM/DD/YYYY")]
    InvalidReleaseDate,
    #[error("No fields to update")]
    NoFieldsToUpdate,
    #[error("Invalid sort_by parameter")]
    InvalidSortBy,
    #[error("Invalid sort_order parameter")]
    InvalidSortOrder,
}
