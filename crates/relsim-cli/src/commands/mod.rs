pub mod completions;
pub mod config;
pub mod replicate;
pub mod run;
pub mod util;
