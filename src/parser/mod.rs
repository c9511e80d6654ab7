pub mod wiki_parser;

pub use wiki_parser::{Parser, WikiParser};
