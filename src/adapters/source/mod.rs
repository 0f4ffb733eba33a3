//! Event sources feeding the registry

pub mod jsonl;

pub use jsonl::JsonlEventSource;
