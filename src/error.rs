use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed after retries")]
    Request {
        url: Url,
        #[source]
        source: reqwest_middleware::Error,
    },
    #[error("{url} answered with status {status}")]
    Status {
        url: Url,
        status: reqwest::StatusCode,
    },
    #[error("could not read the body of {url}")]
    Body {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("URL not supported or unknown: {0}")]
    UnsupportedSite(String),
    #[error("could not parse chapter heading {0:?}")]
    UnparsableHeading(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("archive {} failed verification", .path.display())]
    CorruptSource {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("discovery failed: {0}")]
    Discovery(String),
    #[error("no pages found on {0}")]
    NoPages(Url),
    #[error("no image found on {0}")]
    MissingImage(Url),
    #[error("invalid url {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, Error>;
