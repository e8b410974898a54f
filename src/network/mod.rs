// * Fetch Adapter: single-attempt HTTP GET with a browser identity.

pub mod client;
pub mod errors;
pub mod identity;

pub use client::{FetchConfig, PageFetcher};
pub use errors::FetchError;
pub use identity::BrowserProfile;
