use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Keyword pattern could not be compiled: {0}")]
    Pattern(#[from] regex::Error),
}
