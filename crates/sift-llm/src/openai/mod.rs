pub(crate) mod client;

pub use client::OpenAIClient;
