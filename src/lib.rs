//! Workspace root package. It carries no code of its own and exists so the
//! development hooks in `Cargo.toml` have a package to attach to.
