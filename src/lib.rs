pub mod affiliation;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod common;
pub mod merge;
pub mod normalize;
pub mod remote;
pub mod sources;
