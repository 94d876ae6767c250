//! Helpers for testing mappers and reducers without a real framework.
//!
//! - [`run_mapper_on`] and [`run_reducer_on`] run a job over in-memory input
//!   and capture both the record output and the reporter lines
//! - [`WireBuilder`] assembles wire-format input text
//! - [`mock_input_file`] puts input text into a temporary file
//! - [`FlakyReader`] fails once mid-stream, for exercising read recovery
//!
//! ```
//! use ironstream::context::Context;
//! use ironstream::grouping::Values;
//! use ironstream::job::Job;
//! use ironstream::reducer::FnReducer;
//! use ironstream::testing::{WireBuilder, run_reducer_on};
//!
//! let input = WireBuilder::new().record("a", 1).record("a", 2).record("b", 5).build();
//! let mut sum = FnReducer::new(
//!     |key: String, values: Values<'_, String, i64>, ctx: &mut Context<String, i64>| {
//!         let total: i64 = values.sum();
//!         ctx.write(&key, &total)?;
//!         Ok(())
//!     },
//! );
//! let report = run_reducer_on(Job::<String, i64, String, i64>::new(), &mut sum, &input);
//! assert!(report.result.is_ok());
//! assert_eq!(report.output, "a\t3\nb\t5\n");
//! ```

mod builders;
mod harness;
mod mock_io;

pub use builders::WireBuilder;
pub use harness::{RunReport, SharedBuffer, run_mapper_on, run_reducer_on};
pub use mock_io::{FlakyReader, TempFilePath, mock_input_file, open_input, read_output};
