pub mod error;
pub mod extract;
pub mod requests;
pub mod responses;

pub use error::ApiError;
pub use extract::JsonBody;
