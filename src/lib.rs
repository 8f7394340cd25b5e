pub mod cancel;
pub mod check;
pub mod cli;
pub mod correlate;
pub mod diff;
pub mod error;
pub mod functions;
pub mod language;
pub mod model;
pub mod module;
pub mod parsers;
pub mod report;
