//! Keep/drop marks and drop-merge timing.

/// Frame marks, encode-sequence building, and the mark persistence contract.
pub mod marks;
