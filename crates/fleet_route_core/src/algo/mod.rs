pub(crate) mod assigner;
pub(crate) mod density;
pub(crate) mod packing;
pub(crate) mod rebalance;
pub(crate) mod route_builder;
pub(crate) mod zoning;
