pub mod navigation;
pub mod session;
