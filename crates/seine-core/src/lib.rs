#![deny(missing_docs)]
#![doc = "Core data model for the seine inference runtime: dynamic values, the distribution (ERP) interface with its built-ins, structured errors, and the deterministic RNG policy shared by every inference strategy."]

pub mod dist;
pub mod erp;
pub mod errors;
pub mod math;
pub mod rng;
mod value;

pub use erp::{CustomErp, Distribution, Erp};
pub use errors::{ErrorInfo, SeineError};
pub use math::{logsumexp, multinomial_sample};
pub use rng::{derive_substream_seed, stream_label, RngHandle};
pub use value::Value;
