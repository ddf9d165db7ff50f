use std::fmt;

#[derive(Debug)]
pub enum LogoTableError {
    Font(String),
    MalformedModel(String),
    Pdf(String),
    Io(std::io::Error),
}

impl fmt::Display for LogoTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogoTableError::Font(message) => write!(f, "font error: {}", message),
            LogoTableError::MalformedModel(message) => {
                write!(f, "malformed table model: {}", message)
            }
            LogoTableError::Pdf(message) => write!(f, "pdf error: {}", message),
            LogoTableError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for LogoTableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogoTableError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LogoTableError {
    fn from(value: std::io::Error) -> Self {
        LogoTableError::Io(value)
    }
}
