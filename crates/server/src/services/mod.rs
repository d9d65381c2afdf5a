//! Business logic between the HTTP handlers and the document store.

pub mod hooks;
pub mod records;

pub use hooks::before_change;
pub use records::RecordService;
