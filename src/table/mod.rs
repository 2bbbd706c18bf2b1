// Attribute tables: classification, rendering and the resolution pass

pub mod classify;
pub mod render;
pub mod resolve;

pub use classify::{Badge, ClassGroups, ClassifiedEntry, Classifier, Group};
pub use render::{render_table, BadgeNode, TableColumn, TableItem, TableNode};
pub use resolve::{resolve_documents, ResolutionFailure, ResolutionReport};
