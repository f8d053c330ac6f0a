pub mod envelope;
pub mod error;
pub mod extract;
pub mod manager;
pub mod routes;
pub mod state;

pub use envelope::{Envelope, PaginatedPosts};
pub use error::ApiError;
pub use extract::PostForm;
pub use manager::PostManager;
pub use routes::build_router;
pub use state::AppState;
