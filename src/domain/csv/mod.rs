// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Typed cell values and records produced by the CSV parser
// No I/O, no async

mod record;
mod value;

pub use record::{Header, Record};
pub use value::Value;
