//! Buffer Size Constants
//!
//! Fixed capacities for heap-free builds. Everything in the core is sized at
//! compile time so the pipeline runs without an allocator.

/// Default capacity of the session event inbox.
///
/// Orientation samples coalesce at the tail of the inbox, so the queue only
/// grows with lifecycle events (begin, fixes, stream completions). Sixteen
/// slots cover several complete acquisition attempts between drains.
pub const DEFAULT_INBOX_CAPACITY: usize = 16;

/// Maximum length of a blessing text in bytes.
///
/// Blessings are one poetic sentence; generated text is truncated at a char
/// boundary to fit.
pub const MAX_BLESSING_LEN: usize = 280;
