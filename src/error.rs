use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DatasetError {
    #[error("unknown component id: {0}")]
    #[diagnostic(code(statemod::catalog::unknown_component))]
    UnknownComponent(i32),

    #[error("malformed control file at line {line}: field {field} cannot use value {value:?}")]
    #[diagnostic(code(statemod::control::malformed))]
    MalformedControlFile {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("failed to read response file {path}: {message}")]
    #[diagnostic(code(statemod::manifest::read))]
    ManifestRead { path: Utf8PathBuf, message: String },

    #[error("failed to write response file {path}: {message}")]
    #[diagnostic(code(statemod::manifest::write))]
    ManifestWrite { path: Utf8PathBuf, message: String },

    #[error("failed to load {component} from {path}: {message}")]
    ComponentLoad {
        component: &'static str,
        path: Utf8PathBuf,
        message: String,
    },

    #[error("invalid station id: {0}")]
    InvalidStationId(String),

    #[error("missing config file smdata.json in current directory")]
    MissingConfig,

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
