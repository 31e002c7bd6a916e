//! Canvas document types for cardboard
//!
//! Defines the persisted JSON canvas shape (nodes, edges, metadata), the
//! codec that reads and writes it without corrupting foreign content, and
//! the pure placement planner for new cards.

pub mod codec;
pub mod layout;
pub mod model;

pub use codec::{parse_canvas, serialize_canvas, CanvasError};
pub use layout::{plan_grid, plan_single_insertion, Point, DEFAULT_SINGLE_INSERTION_DROP};
pub use model::{new_card_id, CanvasDocument, FileCard, Node, FILE_NODE_TYPE, METADATA_VERSION};
