pub mod handlers;
pub mod routes;
pub mod upload;

pub use handlers::*;
pub use routes::*;
pub use upload::*;
