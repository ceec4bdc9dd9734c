// Business logic services layer
//
// Reusable logic that is independent of how input is read or output is written.

pub mod coverage;
