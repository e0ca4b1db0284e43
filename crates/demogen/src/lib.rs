//! Top-level facade crate for demogen.
//!
//! Re-exports the core types and the server library so users can depend on a single crate.

pub mod core {
    pub use demogen_core::*;
}

pub mod server {
    pub use demogen_server::*;
}
