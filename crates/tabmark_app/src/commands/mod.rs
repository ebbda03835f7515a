pub mod convert;
pub mod serve;
pub mod triage;
pub mod watch;
