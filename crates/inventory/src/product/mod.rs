//! Product catalog: input commands and the repository that validates them.

mod commands;
mod repository;

pub use commands::{CreateProduct, UpdateProduct};
pub use repository::ProductRepository;
