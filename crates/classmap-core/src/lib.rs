pub mod classifier;
pub mod config;
pub mod graph;
pub mod model;
pub mod source;
pub mod walker;

pub use classifier::{ClassifyError, LibraryClassifier};
pub use config::Config;
pub use graph::TypeGraph;
pub use model::{Arena, Member, MemberRef, Namespace, NamespaceId, TypeDef, TypeId};
pub use source::ReflectionSource;
pub use walker::{discover, DiscoveredSet};
