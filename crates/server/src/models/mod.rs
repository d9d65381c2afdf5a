//! Domain models for the record service.

pub mod document;
pub mod payment;

pub use document::{Document, Page, PageRequest, Pagination};
pub use payment::ReceivedAmountRequest;
