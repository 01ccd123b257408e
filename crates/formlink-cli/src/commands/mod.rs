//! Command implementations.

pub mod process;
pub mod run;
pub mod seed;
pub mod show;
pub mod watch;

pub use self::process::execute_process;
pub use self::run::execute_run;
pub use self::seed::execute_seed;
pub use self::show::execute_show;
pub use self::watch::execute_watch;
