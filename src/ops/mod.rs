pub mod draft;
pub mod notify;
pub mod store;
pub mod timer;
pub mod workspace;
