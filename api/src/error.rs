use thiserror::Error;

/// A payload could not be projected onto the canonical model.
///
/// `path` is the dotted canonical field path, e.g. `player.uid` or
/// `characters[2].light_cone.level`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("missing required field `{path}`")]
    Missing { path: String },
    #[error("field `{path}` should be {expected}, found {found}")]
    InvalidType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl MappingError {
    pub fn path(&self) -> &str {
        match self {
            MappingError::Missing { path } | MappingError::InvalidType { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error("unsupported schema version `{0}`")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error for {url}: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
        url: String,
    },
    #[error("API error for {url}: HTTP {status}")]
    Api { status: u16, url: String },
    #[error("parse error for {url}: {source}")]
    Parsing {
        #[source]
        source: reqwest::Error,
        url: String,
    },
    #[error("invalid request parameters{}", .0.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    InvalidParams(Option<String>),
    #[error("user {0} not found")]
    UserNotFound(u64),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error("unsupported schema version `{0}`")]
    UnsupportedVersion(String),
}

impl From<NormalizeError> for ApiError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::Mapping(e) => ApiError::Mapping(e),
            NormalizeError::UnsupportedVersion(tag) => ApiError::UnsupportedVersion(tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_error_names_its_field() {
        let err = MappingError::Missing { path: "player.uid".into() };
        assert_eq!(err.path(), "player.uid");
        assert_eq!(err.to_string(), "missing required field `player.uid`");
    }

    #[test]
    fn invalid_params_shows_detail_when_present() {
        assert_eq!(
            ApiError::InvalidParams(Some("bad uid".into())).to_string(),
            "invalid request parameters: bad uid"
        );
        assert_eq!(ApiError::InvalidParams(None).to_string(), "invalid request parameters");
    }
}
