pub mod http;
pub mod middleware;
pub mod opencage;

pub use http::build_router;
pub use opencage::OpenCageAdapter;
