use thiserror::Error;

#[derive(Error, Debug)]
pub enum GestureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid axis remap: {x} and {y} share an axis")]
    InvalidRemap { x: String, y: String },

    #[error("Trace line {line}: {message}")]
    TraceParse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GestureError>;
