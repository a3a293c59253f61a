//! Poll loop, rolling bar buffer and the HTTP surface

pub mod bar_buffer;
pub mod http;
pub mod pipeline;
pub mod scheduler;

pub use bar_buffer::*;
pub use http::*;
pub use pipeline::*;
pub use scheduler::*;
