use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("body too large ({size} bytes, limit {limit})")]
    BodyTooLarge { size: u64, limit: u64 },

    #[error("unsupported content-type: {0}")]
    UnsupportedContentType(String),
}
