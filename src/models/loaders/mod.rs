pub mod toml_loader;

pub use toml_loader::{load_problem_run, load_source, parse_problem_run};
