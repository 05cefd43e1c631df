pub mod http;

pub use http::HttpChatClient;
