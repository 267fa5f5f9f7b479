pub mod feedback;
pub mod models;
pub mod records;

mod memory;
pub use memory::MemoryStore;

pub use feedback::{FeedbackDraft, FeedbackForm, FeedbackPhase};
pub use models::{FeedbackEntry, Rating, UsageSession};
pub use records::{RecordStore, StoreError};
