//! Layer roots and run configuration.

mod layer_pair;
mod options;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use layer_pair::*;
pub use options::*;
