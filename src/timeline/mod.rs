pub(crate) mod clock;
pub(crate) mod resolve;
pub(crate) mod scrub;
pub(crate) mod ticker;
