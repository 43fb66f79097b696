pub mod bucket;
pub mod error;
pub mod record;
pub mod report;
pub mod row;
pub mod value;

pub use bucket::Bucket;
pub use error::FieldError;
pub use record::{ImageMetadata, ImageRecord};
pub use report::ApplyReport;
pub use row::RawRow;
pub use value::MetadataValue;
