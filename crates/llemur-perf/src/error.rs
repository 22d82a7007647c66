use thiserror::Error;

#[derive(Error, Debug)]
pub enum PerfError {
    #[error("Unsupported file type for {0}")]
    UnsupportedFileType(String),

    #[error("Prompt template for {language} not found at {path}")]
    TemplateNotFound { language: String, path: String },

    #[error("Template error: {0}")]
    Template(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Model {model} is not available for {provider}. Choose from {available}.")]
    UnknownModel {
        provider: String,
        model: String,
        available: String,
    },

    #[error("Error reading file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing to output file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PerfResult<T> = Result<T, PerfError>;
