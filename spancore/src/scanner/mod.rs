pub mod span;
pub mod dictionary;
pub mod mention;
pub mod hashtag;
pub mod terms;
pub mod merge;
pub mod recipients;
pub mod tally;
pub mod document;

pub use span::*;
pub use dictionary::*;
pub use mention::*;
pub use hashtag::*;
pub use terms::*;
pub use merge::*;
pub use recipients::*;
pub use tally::*;
pub use document::*;

#[cfg(test)]
mod tests;
