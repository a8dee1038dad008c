pub(crate) mod common;
mod listing;
