pub(crate) mod defaults;
pub(crate) mod lint;
pub(crate) mod sync;
pub(crate) mod table;
pub(crate) mod validate;
pub(crate) mod visible;
