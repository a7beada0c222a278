pub mod handlers;
pub mod import;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
