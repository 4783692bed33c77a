pub mod backend;
pub mod client;
pub mod error;
pub mod types;

pub use backend::FacilityBackend;
pub use client::ApiClient;
pub use error::ClientError;
pub use types::{FilterRequest, Profile, SearchRequest, UploadResponse};
