#![forbid(unsafe_code)]

//! Parser for mooring-system descriptor files: section-delimited text
//! describing the bodies, rods, and points of a mooring system plus a
//! free-form options table.
//!
//! Only externally coupled objects are retained: they determine the
//! dimensionality of the prescribed-motion excitation handed to the
//! simulation backends.

pub mod error;
pub mod model;
pub mod options;
pub mod parse;
pub mod section;

pub use error::DescriptorError;
pub use model::{Body, CouplingMode, Point, Rod, SystemDescriptor, BODY_DOF, POINT_DOF};
pub use options::OptionsBag;
pub use parse::{load_descriptor, parse_descriptor};
pub use section::SectionKind;
