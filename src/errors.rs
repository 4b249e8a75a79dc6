use std::fmt;

#[derive(Debug, Clone)]
pub enum LedgerError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    UnknownKind(String),
    AlreadyTaken(String),
    Conflict(String),
    Unsupported(String),
    Serialization(String),
    DateParse(String),
    PasswordHash(String),
    Report(String),
}

impl LedgerError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::DatabaseConfig(_) => "E001",
            LedgerError::DatabaseConnection(_) => "E002",
            LedgerError::DatabaseOperation(_) => "E003",
            LedgerError::FileOperation(_) => "E004",
            LedgerError::Validation(_) => "E005",
            LedgerError::NotFound(_) => "E006",
            LedgerError::Conflict(_) => "E007",
            LedgerError::Unsupported(_) => "E008",
            LedgerError::Serialization(_) => "E009",
            LedgerError::DateParse(_) => "E010",
            LedgerError::PasswordHash(_) => "E011",
            LedgerError::Report(_) => "E012",
            LedgerError::UnknownKind(_) => "E013",
            LedgerError::AlreadyTaken(_) => "E014",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            LedgerError::DatabaseConfig(_) => "Database Configuration Error",
            LedgerError::DatabaseConnection(_) => "Database Connection Error",
            LedgerError::DatabaseOperation(_) => "Database Operation Error",
            LedgerError::FileOperation(_) => "File Operation Error",
            LedgerError::Validation(_) => "Validation Error",
            LedgerError::NotFound(_) => "Resource Not Found",
            LedgerError::Conflict(_) => "Conflict",
            LedgerError::Unsupported(_) => "Unsupported Operation",
            LedgerError::Serialization(_) => "Serialization Error",
            LedgerError::DateParse(_) => "Date Parse Error",
            LedgerError::PasswordHash(_) => "Password Hash Error",
            LedgerError::Report(_) => "Report Error",
            LedgerError::UnknownKind(_) => "Unknown Instrument Kind",
            LedgerError::AlreadyTaken(_) => "Already Taken",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LedgerError::DatabaseConfig(msg)
            | LedgerError::DatabaseConnection(msg)
            | LedgerError::DatabaseOperation(msg)
            | LedgerError::FileOperation(msg)
            | LedgerError::Validation(msg)
            | LedgerError::NotFound(msg)
            | LedgerError::Conflict(msg)
            | LedgerError::Unsupported(msg)
            | LedgerError::Serialization(msg)
            | LedgerError::DateParse(msg)
            | LedgerError::PasswordHash(msg)
            | LedgerError::Report(msg)
            | LedgerError::UnknownKind(msg)
            | LedgerError::AlreadyTaken(msg) => msg,
        }
    }

    /// HTTP status the API layer answers with for this error
    pub fn http_status(&self) -> u16 {
        match self {
            LedgerError::Validation(_)
            | LedgerError::DateParse(_)
            | LedgerError::AlreadyTaken(_) => 422,
            LedgerError::Unsupported(_) => 400,
            LedgerError::NotFound(_) | LedgerError::UnknownKind(_) => 404,
            LedgerError::Conflict(_) => 409,
            _ => 500,
        }
    }

    /// Colored output for terminals
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// Plain output for CLI mode
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LedgerError {}

impl LedgerError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LedgerError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LedgerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LedgerError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LedgerError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LedgerError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LedgerError::NotFound(msg.into())
    }

    pub fn unknown_kind<T: Into<String>>(msg: T) -> Self {
        LedgerError::UnknownKind(msg.into())
    }

    /// A unique field (account number, email) is already in use
    pub fn already_taken<T: Into<String>>(msg: T) -> Self {
        LedgerError::AlreadyTaken(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        LedgerError::Conflict(msg.into())
    }

    pub fn unsupported<T: Into<String>>(msg: T) -> Self {
        LedgerError::Unsupported(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LedgerError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        LedgerError::DateParse(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        LedgerError::PasswordHash(msg.into())
    }

    pub fn report<T: Into<String>>(msg: T) -> Self {
        LedgerError::Report(msg.into())
    }
}

impl From<sea_orm::DbErr> for LedgerError {
    fn from(err: sea_orm::DbErr) -> Self {
        LedgerError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LedgerError {
    fn from(err: chrono::ParseError) -> Self {
        LedgerError::DateParse(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        LedgerError::Report(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(LedgerError::validation("x").http_status(), 422);
        assert_eq!(LedgerError::not_found("x").http_status(), 404);
        assert_eq!(LedgerError::unknown_kind("x").http_status(), 404);
        assert_eq!(LedgerError::already_taken("x").http_status(), 422);
        assert_eq!(LedgerError::conflict("x").http_status(), 409);
        assert_eq!(LedgerError::unsupported("x").http_status(), 400);
        assert_eq!(LedgerError::database_operation("x").http_status(), 500);
    }

    #[test]
    fn test_format_simple() {
        let err = LedgerError::not_found("Instrument 7 not found");
        assert_eq!(err.code(), "E006");
        assert_eq!(
            err.format_simple(),
            "Resource Not Found: Instrument 7 not found"
        );
        assert_eq!(err.to_string(), err.format_simple());
    }

    #[test]
    fn test_from_db_err() {
        let err: LedgerError = sea_orm::DbErr::Custom("boom".into()).into();
        assert!(matches!(err, LedgerError::DatabaseOperation(_)));
        assert!(err.message().contains("boom"));
    }
}
