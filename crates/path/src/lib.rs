//! NeXus object paths: model, grammar and algebra.
//!
//! Paths address groups, fields and attributes inside a hierarchical data
//! container:
//!
//! ```text
//! scan.nxs:///entry:NXentry/instrument:NXinstrument/detector/data@units
//! ```
pub mod algebra;
pub mod error;
pub mod model;
pub mod parser;

pub use algebra::{is_prefix, join, make_relative, normalize, split};
pub use error::{PathError, Result};
pub use model::{GroupElement, Path};
pub use parser::{PathParser, parse_path};
