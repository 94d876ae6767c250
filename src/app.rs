//! Process entry point for a worker binary.
//!
//! The framework launches the same binary for both phases and selects the
//! role on the command line:
//!
//! ```text
//! worker            # map phase
//! worker --reducer  # reduce phase
//! worker --role reducer --log-level debug
//! ```

use crate::error::StreamingError;
use anyhow::Result;
use clap::Parser;
use std::fmt;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{Level, debug};

/// Which phase a worker process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Mapper,
    Reducer,
}

impl FromStr for Role {
    type Err = StreamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "map" | "mapper" => Ok(Self::Mapper),
            "reduce" | "reducer" => Ok(Self::Reducer),
            other => Err(StreamingError::config(format!(
                "unknown role {other:?}, expected mapper or reducer"
            ))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mapper => "mapper",
            Self::Reducer => "reducer",
        })
    }
}

/// Command line shared by every worker binary.
///
/// Flatten it into a binary's own arguments with `#[command(flatten)]`.
#[derive(Debug, Clone, Parser)]
pub struct StreamingArgs {
    /// Run the reduce phase.
    #[arg(long, conflicts_with = "role")]
    pub reducer: bool,

    /// Phase to run: mapper or reducer.
    #[arg(long, value_name = "ROLE")]
    pub role: Option<Role>,

    /// Most verbose diagnostic level written to stderr.
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: Level,
}

impl StreamingArgs {
    #[must_use]
    pub fn role(&self) -> Role {
        if self.reducer {
            Role::Reducer
        } else {
            self.role.unwrap_or_default()
        }
    }
}

/// Install the stderr diagnostics subscriber.
///
/// Stdout carries records, so diagnostics never go there. A second call is a
/// no-op.
pub fn init_logging(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

type RoleRunner<'a> = Box<dyn FnOnce() -> Result<()> + 'a>;

/// Binds a map runner and a reduce runner to the command line.
///
/// ```no_run
/// use ironstream::app::Application;
/// use ironstream::job::Job;
/// use ironstream::mapper::IdentityMapper;
/// use ironstream::reducer::IdentityReducer;
/// use std::io;
///
/// fn main() -> std::process::ExitCode {
///     Application::new()
///         .with_mapper(|| {
///             Job::<String, String, String, String>::new().run_mapper(
///                 &mut IdentityMapper::default(),
///                 io::stdin().lock(),
///                 io::stdout(),
///             )
///         })
///         .with_reducer(|| {
///             Job::<String, String, String, String>::new().run_reducer(
///                 &mut IdentityReducer::default(),
///                 io::stdin().lock(),
///                 io::stdout(),
///             )
///         })
///         .run()
/// }
/// ```
#[derive(Default)]
pub struct Application<'a> {
    mapper: Option<RoleRunner<'a>>,
    reducer: Option<RoleRunner<'a>>,
}

impl<'a> Application<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mapper(mut self, run: impl FnOnce() -> Result<()> + 'a) -> Self {
        self.mapper = Some(Box::new(run));
        self
    }

    #[must_use]
    pub fn with_reducer(mut self, run: impl FnOnce() -> Result<()> + 'a) -> Self {
        self.reducer = Some(Box::new(run));
        self
    }

    /// Run the runner bound to `role`.
    pub fn run_role(self, role: Role) -> Result<()> {
        let runner = match role {
            Role::Mapper => self.mapper,
            Role::Reducer => self.reducer,
        };
        let Some(run) = runner else {
            return Err(StreamingError::config(format!("no {role} configured")).into());
        };
        debug!(%role, "starting task");
        run()
    }

    /// Initialise logging from `args` and run the selected role.
    pub fn run_with(self, args: &StreamingArgs) -> Result<()> {
        init_logging(args.log_level);
        self.run_role(args.role())
    }

    /// Parse the process arguments, run, and report failure on stderr.
    pub fn run(self) -> ExitCode {
        let args = StreamingArgs::parse();
        report(self.run_with(&args))
    }
}

/// Turn a task outcome into an exit code, printing the error chain to stderr.
pub fn report(outcome: Result<()>) -> ExitCode {
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
