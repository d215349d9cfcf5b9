pub mod error;
pub mod transport;

pub use error::FeedError;
pub use transport::{FeedTransport, ThingSpeakTransport};
