pub mod memory;

pub use memory::{CascadeScope, ClinicStore, StoreError};
