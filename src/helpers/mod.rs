pub(crate) mod batches;
pub(crate) mod distinct;
pub(crate) mod inspect;
pub(crate) mod rate_limit;
pub(crate) mod take;
pub(crate) mod try_process;
