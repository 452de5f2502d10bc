pub mod types;
pub mod allow_list;
pub mod config;
pub mod dates;
pub mod emitter;
pub mod fetcher;
pub mod filter;
pub mod parser;
pub mod pipeline;
pub mod reconcile;
pub mod traits;

pub use types::*;
pub use allow_list::AuthorAllowList;
pub use config::{Cli, RunConfig};
pub use dates::{parse_published, DateUnparseable};
pub use fetcher::Fetcher;
pub use filter::{FilterConfig, InclusionFilter, InclusionRule};
pub use parser::FeedParser;
pub use pipeline::{Archive, FilterPipeline};
pub use reconcile::reconcile;
pub use traits::FeedSource;
