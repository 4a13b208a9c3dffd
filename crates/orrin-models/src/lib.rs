pub mod category;
pub mod error;
pub mod lists;
pub mod media;
pub mod status;

pub use category::MediaCategory;
pub use error::ParseError;
pub use lists::{CustomList, StatusBucket};
pub use media::{MediaItem, MediaType};
pub use status::StatusLabel;
