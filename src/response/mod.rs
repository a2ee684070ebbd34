pub mod errors;
pub mod pipeline;
pub mod types;

pub use errors::ResponseError;
pub use pipeline::process_response;
pub use types::{Charset, PageResponse};
