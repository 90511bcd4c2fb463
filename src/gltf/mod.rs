//! glTF 2.0 document construction and serialization.

mod builder;
mod export;
pub mod types;

pub use builder::GltfBuilder;
pub use export::{CHUNK_BIN, CHUNK_JSON, GLB_MAGIC, GLB_VERSION};
