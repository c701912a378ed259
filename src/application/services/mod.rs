//! Application services

pub mod mutation;
pub mod node_service;
pub mod query;

pub use mutation::BoundaryMutationEngine;
pub use node_service::NodeService;
pub use query::IntervalQueryEngine;
