pub mod ports;
pub mod store;
pub mod persistence;
pub mod pipeline;
pub mod session;
pub mod event_bus;
