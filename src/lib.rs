pub mod analyzers;
pub mod error;
pub mod groups;
pub mod ingest;
pub mod normalize;
pub mod output;
pub mod record;
pub mod server;
pub mod session;
pub mod summarize;
