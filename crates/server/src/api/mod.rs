pub mod error;
pub mod handlers;
pub mod insights;
pub mod middleware;
pub mod movies;
pub mod routes;

pub use error::ApiError;
pub use routes::create_router;
