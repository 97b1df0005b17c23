use thiserror::Error;

pub type MatchResult<T> = Result<T, MatchError>;

#[derive(Error, Debug)]
pub enum MatchError {
    /// A required request input (file or search term) was not supplied.
    #[error("{0}")]
    InputMissing(String),

    /// A file part was supplied but it has no name or no content.
    #[error("No selected file")]
    EmptySelection,

    #[error("No sheet containing \"{0}\" found")]
    SheetNotFound(String),

    #[error("No recognizable item column found in sheet \"{0}\"")]
    ColumnNotFound(String),

    #[error("Failed to read spreadsheet: {0}")]
    Parse(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl MatchError {
    pub fn no_file_part() -> Self {
        MatchError::InputMissing("No file part".to_string())
    }

    pub fn no_search_term() -> Self {
        MatchError::InputMissing("No search term provided".to_string())
    }

    /// Errors the caller could have avoided by sending a complete request.
    pub fn is_input_error(&self) -> bool {
        matches!(self, MatchError::InputMissing(_) | MatchError::EmptySelection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_not_found_message() {
        let err = MatchError::SheetNotFound("Detail".to_string());
        assert_eq!(err.to_string(), "No sheet containing \"Detail\" found");
    }

    #[test]
    fn test_column_not_found_message_prefix() {
        let err = MatchError::ColumnNotFound("Cost Detail".to_string());
        assert!(err
            .to_string()
            .starts_with("No recognizable item column found"));
    }

    #[test]
    fn test_input_errors_classified() {
        assert!(MatchError::no_file_part().is_input_error());
        assert!(MatchError::no_search_term().is_input_error());
        assert!(MatchError::EmptySelection.is_input_error());
        assert!(!MatchError::Parse("bad zip".to_string()).is_input_error());
        assert!(!MatchError::SheetNotFound("Detail".to_string()).is_input_error());
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: MatchError = io.into();
        assert!(err.to_string().contains("gone"));
    }
}
