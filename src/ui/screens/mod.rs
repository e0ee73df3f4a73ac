pub(crate) mod catalog;
pub(crate) mod costs;
pub(crate) mod dashboard;
pub(crate) mod quotes;
