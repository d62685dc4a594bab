pub mod message;

pub use message::{EditOutcome, MessageService};
