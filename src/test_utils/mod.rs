//! Testing utilities
mod route_builder;
mod test_context;

pub(crate) use route_builder::RouteBuilder;
pub(crate) use test_context::TestContext;
