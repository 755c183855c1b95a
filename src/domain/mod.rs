//! Domain Layer
//!
//! Topology model and port definitions, without I/O.
//!
//! ## Structure
//!
//! - `entities/` - Nodes and topology rules
//! - `value_objects/` - Roles and service flags
//! - `ports/` - Interfaces implemented by the infrastructure layer

pub mod entities;
pub mod ports;
pub mod value_objects;
