// Library for tests to access modules

pub mod actions;
pub mod config;
pub mod console;
pub mod dom;
pub mod error;
pub mod models;
pub mod notify;
pub mod page;
pub mod poller;
pub mod render;
pub mod transport;
pub mod version;
