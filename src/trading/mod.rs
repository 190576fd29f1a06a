//! Order types, quote sizing, and the quote lifecycle state machine.

pub mod lifecycle;
pub mod order;
pub mod sizer;

pub use lifecycle::{PositionState, QuoteController, QuoteState};
pub use order::{OrderParams, QuoteSide, RestingOrder, Side};
pub use sizer::QuoteSizer;
