//! Sort resolution: column mapping, allow-lists, and tie-breaker
//! completion.
//!
//! Every list operation funnels its requested ordering through this
//! module. [`SortResolver`] translates business field names into safe,
//! storage-qualified column references; [`normalize_sorts`] produces the
//! final, order-preserving sort list, injecting the cursor tie-breaker in
//! cursor mode so that keyset comparisons stay well-defined.

mod normalize;
mod resolver;

pub use normalize::{CursorKeyDef, NormalizeInput, normalize_sorts};
pub use resolver::{SortResolver, is_valid_column_reference};
