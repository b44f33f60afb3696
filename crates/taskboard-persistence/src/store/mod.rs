pub mod atomic_writer;
pub mod file_blob_store;
pub mod memory_blob_store;

pub use atomic_writer::AtomicWriter;
pub use file_blob_store::FileBlobStore;
pub use memory_blob_store::MemoryBlobStore;
