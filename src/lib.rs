//! # Ironstream
//!
//! Typed **mapper and reducer workers** for line-oriented, Hadoop-style
//! streaming. A worker process reads `key<TAB>value` lines from stdin,
//! decodes them into Rust values, hands them to user logic and writes the
//! encoded results to stdout. Counters and status updates go to stderr as
//! `reporter:` lines for the controlling framework.
//!
//! ## Key Features
//!
//! - **Typed codecs**: built-in wire forms for booleans, integers of every
//!   width, floats, complex numbers and strings; anything else travels as
//!   compact JSON
//! - **Lazy grouping**: reducers receive each run of equal keys as an
//!   iterator that never buffers the group
//! - **Recoverable reads**: malformed lines are routed to an error hook that
//!   decides whether the task continues
//! - **Keyless jobs**: inputs and outputs may carry only values
//! - **Error aggregation**: handler, cleanup and flush failures are reported
//!   together
//!
//! ## Quick Start
//!
//! ```
//! use ironstream::prelude::*;
//! use std::io::Cursor;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut count = FnReducer::new(
//!     |word: String, values: Values<'_, String, u64>, ctx: &mut Context<String, u64>| {
//!         ctx.write(&word, &values.sum())?;
//!         Ok(())
//!     },
//! );
//!
//! let input = Cursor::new(b"hello\t1\nhello\t1\nworld\t1\n".to_vec());
//! let output = SharedBuffer::new();
//! Job::<String, u64, String, u64>::new().run_reducer(&mut count, input, output.clone())?;
//!
//! assert_eq!(output.text(), "hello\t2\nworld\t1\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Jobs
//!
//! A [`Job`] holds the four codecs of a task (input key and value, output
//! key and value), resolved from a [`CodecRegistry`](codec::CodecRegistry).
//! Each can be overridden, and either side can be made keyless.
//!
//! ### Handlers
//!
//! [`Mapper`] and [`Reducer`] carry the user logic. Only the per-record (or
//! per-group) method is required; `setup`, `cleanup` and `on_read_error`
//! have defaults. Closures can be used through [`FnMapper`] and
//! [`FnReducer`].
//!
//! ### Execution
//!
//! [`Job::run_mapper`] and [`Job::run_reducer`] run one task to completion:
//! setup, the record loop, cleanup, then a single flush of the output. The
//! [`app`] module binds both runners to the process command line.
//!
//! ## Wire format
//!
//! ```text
//! key<TAB>value\n      keyed record, split on the first tab
//! value\n              keyless record
//! \n                   blank line, skipped
//! ```
//!
//! Keys must not contain a tab; neither part may contain a newline.

pub mod app;
pub mod codec;
pub mod context;
pub mod error;
pub mod grouping;
pub mod io;
pub mod job;
pub mod mapper;
pub mod policy;
pub mod reducer;
pub mod reporter;
pub mod runner;
pub mod testing;
pub mod type_token;
pub mod utils;

pub use app::{Application, Role, StreamingArgs};
pub use codec::{Codec, CodecRegistry};
pub use context::Context;
pub use error::{MultiError, StreamResult, StreamingError, merge_errors};
pub use grouping::{GroupingEngine, Values};
pub use job::Job;
pub use mapper::{FnMapper, IdentityMapper, Mapper};
pub use policy::ReadErrorPolicy;
pub use reducer::{FnReducer, IdentityReducer, Reducer};
pub use utils::{Complex, Complex32, Complex64};

/// Everything a typical worker needs.
pub mod prelude {
    pub use crate::app::{Application, Role, StreamingArgs};
    pub use crate::codec::{Codec, CodecRegistry};
    pub use crate::context::Context;
    pub use crate::error::{StreamResult, StreamingError};
    pub use crate::grouping::Values;
    pub use crate::job::Job;
    pub use crate::mapper::{FnMapper, IdentityMapper, Mapper};
    pub use crate::policy::ReadErrorPolicy;
    pub use crate::reducer::{FnReducer, IdentityReducer, Reducer};
    pub use crate::testing::SharedBuffer;
    pub use crate::utils::{Complex32, Complex64};
}
