//! Combat log access: shared reads, file discovery and incremental parsing

mod discovery;
mod io;
mod parser;
mod paths;
mod timestamp;

pub use discovery::{DirectoryDiscovery, FixedFile, LogDiscovery};
pub use io::{read_shared, FileSource, LogSource};
pub use parser::{
    parse_content, parse_line, LineError, LogParser, ParseError, DAMAGE_DONE, VERSION_HEADER,
};
pub use paths::Paths;
pub use timestamp::{parse_timestamp, FULL_FORMAT, SHORT_FORMAT};
