//! # Desktop Bridge Implementations
//!
//! Default implementations of the native-side bridge traits for desktop
//! platforms (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpBackend` using `reqwest`, activated once per instance
//! - A process-global backend with free functions mirroring the native
//!   component's exported API (`set_global_default_user_agent`,
//!   `init_backend`)
//!
//! Host-side console sinks live in `bridge_traits::host`.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{init_backend, set_global_default_user_agent};
//!
//! set_global_default_user_agent("MyApp/1.0");
//! init_backend()?;
//! ```

mod global;
mod http;

pub use global::{
    global_backend, init_backend, install_global_backend, set_global_default_user_agent,
};
pub use http::ReqwestBackend;
