//! Top-level facade crate for vigil.
//!
//! Re-exports the metric core and the server library so users can depend on a single crate.

pub mod core {
    pub use vigil_core::*;
}

pub mod server {
    pub use vigil_server::*;
}
