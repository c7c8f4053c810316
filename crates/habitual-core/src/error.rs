use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HabitualError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
