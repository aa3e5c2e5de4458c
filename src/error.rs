use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid api url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{method} {path} returned {status}")]
    UnexpectedStatus {
        method: String,
        path: String,
        status: u16,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("invalid base64url key: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("expected a 65 byte public key, got {0} bytes")]
    InvalidLength(usize),

    #[error("public key is not an uncompressed point (leading byte {0:#04x})")]
    NotUncompressedPoint(u8),
}

#[derive(Debug, thiserror::Error)]
pub enum PushSetupError {
    #[error("push setup failed: agent registration: {0}")]
    Register(String),

    #[error("push setup failed: agent never became ready: {0}")]
    Ready(String),

    #[error("push setup failed: subscribe: {0}")]
    Subscribe(String),

    #[error("push setup failed: {0}")]
    Key(#[from] KeyError),

    #[error("push setup failed: {0}")]
    Api(#[from] ApiError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid api url '{0}'")]
    InvalidApiUrl(String),

    #[error("{0}")]
    Invalid(String),
}
