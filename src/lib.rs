pub mod magic;
pub mod block;
pub mod header;
pub mod value;
pub mod array;
pub mod sheet;
pub mod writer;
pub mod filter;
pub mod error;

pub use array::ScientificArray;
pub use error::ArchiveError;
pub use filter::{read_archive, FileFilter, ProjectArchiveFilter};
pub use header::ColumnHeader;
pub use magic::VersionToken;
pub use value::Cell;
