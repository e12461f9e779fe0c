//! Workspace tooling package.
//!
//! Carries the rusty-hook pre-commit configuration. The library and CLI live
//! under `crates/`.
