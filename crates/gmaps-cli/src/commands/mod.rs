// One module per subcommand; main.rs only parses and dispatches.

pub mod call;
pub mod serve;
pub mod tools;
