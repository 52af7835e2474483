//! Article to request and response to text conversion

pub mod prompt;
pub mod request_builder;
pub mod response_extractor;
