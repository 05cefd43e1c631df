//! Browser adapters for the chat-core ports.

pub mod remote;
pub mod storage;
pub mod timer;

#[cfg(test)]
mod tests;
