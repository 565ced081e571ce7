pub mod client;
pub mod fetcher;
pub mod parser;

pub use client::{BuildSource, CircleClient, PAGE_SIZE};
pub use fetcher::BuildFetcher;
pub use parser::{RawBuild, WorkflowInfo};
