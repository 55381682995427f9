//! Knowledge base persistence: the JSON record format, the bundled default
//! dataset and the file-backed store used by the host.

pub mod format;
pub mod load;
pub mod store;

pub use format::*;
pub use load::*;
pub use store::*;
