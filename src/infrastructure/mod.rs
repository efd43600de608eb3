pub mod config;
pub mod http;
pub mod navigation;
pub mod storage;
