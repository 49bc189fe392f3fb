pub mod guards;
pub mod router;
pub mod routes;

pub use router::{AdlabState, adlab_router, cors_layer};
