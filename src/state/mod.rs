//! Desired and observed resource state.
//!
//! [`DesiredState`] holds the declarative parameters a caller asks for.
//! [`LiveState`] wraps the `inspect` documents Podman reports for an existing
//! resource, with every object key lower-cased so lookups are
//! case-insensitive. [`Field`] navigates those documents without ever
//! failing: a missing key is just an empty value.

mod field;
mod live;
mod load;
mod value;


pub use field::Field;
pub use live::{CreateCommand, LiveState, lower_keys};
pub use load::load_json_document;
pub use value::{DesiredState, ParamValue, scalar_text};
