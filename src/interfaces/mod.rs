//! Wire formats at the edge of the crate: the JSON seed catalog on the way in,
//! schedule mutations and result listings as CSV.

pub mod csv;
pub mod json;
