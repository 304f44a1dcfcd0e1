pub mod downloads;
pub mod export;
pub mod handlers;
pub mod routes;

pub use routes::create_router;
