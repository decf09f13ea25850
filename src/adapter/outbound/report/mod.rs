//! Report source adapters.

mod file;
mod http;

pub use file::FileReportSource;
pub use http::HttpReportSource;
