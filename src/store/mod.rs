pub mod memory;
pub mod repo;
pub mod s3;

pub use repo::{ObjectListing, ObjectStore};
