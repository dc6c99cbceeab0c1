pub mod commands;
pub mod input;
pub mod trace_init;
