// Module model for registered load units
//
// A module is an indivisible artifact (a script, a stylesheet, a bundle)
// identified by its source, providing and requiring capability ids.

mod module;

pub use module::Module;
