//! Use cases - operations the CLI offers over map files.
//!
//! Each module covers one area and orchestrates records, adapters and the
//! domain model.

pub mod inspect;
pub mod load;
pub mod map_io;
