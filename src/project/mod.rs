pub(crate) mod dsl;
pub(crate) mod model;
pub(crate) mod properties;
pub(crate) mod store;
