pub mod outcome;
pub mod report;

pub use outcome::*;
pub use report::*;

pub const NOTIFICATION_SUBJECT: &str = "Puppies might be available";
