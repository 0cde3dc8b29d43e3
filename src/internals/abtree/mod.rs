pub(crate) mod node;
pub(crate) mod raw;
pub(crate) mod states;
