pub mod automation;
pub mod config;
pub mod error;
pub mod library;
pub mod materials;
pub mod server;
pub mod upstream;
pub(crate) mod utils;

pub use error::AdlabError;
