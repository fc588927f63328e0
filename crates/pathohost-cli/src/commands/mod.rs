pub mod dock;
pub mod fetch;
pub mod poses;
mod report;
pub mod search;
pub mod view;
