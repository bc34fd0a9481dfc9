//! Route Layer
//!
//! A route is a prompt, an input shape, an output shape and a failure
//! policy. Every route runs through the same [`RoutePipeline`].

pub mod catalog;
pub mod pipeline;
pub mod spec;
pub mod template;

pub use catalog::RouteRegistry;
pub use pipeline::{RouteOutput, RoutePipeline};
pub use spec::{ResponseFormat, RouteSpec, RouteSummary};
pub use template::PromptTemplate;
