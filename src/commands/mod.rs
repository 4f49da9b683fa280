//! One handler module per Dispatcher subcommand (spec.md §4.7, §6).
//! Grounded on the teacher's `tools::mod::dispatch(name, args) -> Result`
//! table, generalized to the top-level command tree in [`crate::cli`].
pub mod cloud;
pub mod leaf;
pub mod pipeline;
pub mod project;
pub mod twig;
