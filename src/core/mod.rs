pub mod intern;
pub mod span;

pub use intern::{Interner, Name};
pub use span::{FileId, Span};
