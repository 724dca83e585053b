use thiserror::Error;

pub type Result<T> = std::result::Result<T, CrmError>;

#[derive(Error, Debug)]
pub enum CrmError {
    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Error al leer el CSV: {}", .0.join(", "))]
    CsvParse(Vec<String>),

    #[error("El CSV no contiene datos o tiene un formato incorrecto.")]
    CsvEmpty,

    #[error("Archivo demasiado grande: {actual} bytes (máximo {limit}).")]
    FileTooLarge { limit: usize, actual: usize },

    #[error("Tipo de imagen no soportado: {0}")]
    UnsupportedImage(String),

    #[error("Proyecto no encontrado: {0}")]
    ProjectNotFound(String),

    #[error("Cliente no encontrado: {0}")]
    ClientNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrmError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CrmError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
