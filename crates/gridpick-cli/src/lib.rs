// gridpick command-line front end: file-backed providers and subcommands.

pub mod commands;
pub mod sources;
