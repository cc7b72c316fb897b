//! borang-storage: the persistence seam between hosts and the engine.
//!
//! The engine only ever sees plain data structures; loading templates and
//! persisting submissions belongs to the host, behind the repository
//! traits defined here. `MemoryStore` is the reference backend used by
//! tests and embedding examples.

mod error;
mod memory;
mod record;
mod traits;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use record::{FormSubmissionRecord, TemplateSummary};
pub use traits::{SubmissionStore, TemplateStore};
