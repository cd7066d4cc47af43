//! Field normalization: free text in, typed listing attributes out.
//!
//! Every function here is pure and total. Text that does not match any of the
//! expected patterns resolves to an absent value rather than an error.

mod postcode;
mod price;
mod sale_type;
mod size;
mod tenure;
pub mod text;

pub use postcode::extract_postcode;
pub use price::{extract_price, PriceRule};
pub use sale_type::{normalize_sale_type, terminal_marker, TerminalMarker};
pub use size::{extract_size, SizeMeasurement, SQFT_PER_ACRE};
pub use tenure::extract_tenure;
