pub(crate) mod planner;
pub(crate) mod statistics;
pub(crate) mod suggestions;
