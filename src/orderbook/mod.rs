//! Order book snapshot building and accessors.
//!
//! Raw bid/ask levels from the market data collaborator are normalized into
//! a [`BookSnapshot`]: sorted best-price first per side, with a cumulative
//! size column running from the best price outward.

pub mod builder;
pub mod types;

pub use builder::build_snapshot;
pub use types::{BookSide, BookSnapshot, DepthLevel, PriceLevel, RawBook};
