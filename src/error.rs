use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SumError {
    #[error("The path {0} not exist")]
    PathNotExist(String),

    #[error("The path {0} is not a file")]
    NotAFile(String),

    #[error("Improperly formatted checksum line {line}: `{content}`")]
    MalformedCheckLine { line: usize, content: String },

    #[error("{mismatched} computed checksum(s) did NOT match, {unreadable} listed file(s) could not be read")]
    CheckFailed { mismatched: usize, unreadable: usize },

    #[error("{0}")]
    Config(String),
}
