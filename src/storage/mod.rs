//! Storage layer for tooltrack - one `ToolStore` trait, two backends.
//!
//! - `LocalToolStore`: the whole collection snapshotted into a local
//!   key/value directory on every write
//! - `RemoteToolStore`: one HTTP round trip per operation against the REST API

mod local;
mod remote;
mod traits;

pub use local::{LANGUAGE_KEY, LocalStorage, LocalToolStore, TOOLS_KEY};
pub use remote::RemoteToolStore;
pub use traits::ToolStore;
