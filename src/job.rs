//! Codec configuration of one streaming task.
//!
//! A [`Job`] resolves the four codecs a task needs (input key and value,
//! output key and value) from a [`CodecRegistry`], lets any of them be
//! overridden, and validates the set before the task runs.
//!
//! ```
//! use ironstream::job::Job;
//! use ironstream::mapper::IdentityMapper;
//! use std::io::Cursor;
//!
//! let job = Job::<String, i64, String, i64>::new();
//! let mut mapper = IdentityMapper::default();
//! job.run_mapper(&mut mapper, Cursor::new(b"a\t1\n".to_vec()), std::io::sink())
//!     .unwrap();
//! ```

use crate::codec::{Codec, CodecRegistry, SharedCodec, WireValue};
use crate::context::Context;
use crate::error::{StreamResult, StreamingError};
use crate::grouping::GroupingEngine;
use crate::io::record::{KeyIn, KeyOut, RecordDecoder, RecordEncoder};
use crate::mapper::Mapper;
use crate::reducer::Reducer;
use crate::reporter::Reporter;
use crate::runner;
use anyhow::Result;
use std::any::type_name;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::debug;

/// The codecs and side channel of one map or reduce task.
pub struct Job<KI, VI, KO, VO> {
    key_in: Option<KeyIn<KI>>,
    value_in: Option<SharedCodec<VI>>,
    key_out: Option<KeyOut<KO>>,
    value_out: Option<SharedCodec<VO>>,
    reporter: Reporter,
}

impl<KI, VI, KO, VO> Job<KI, VI, KO, VO>
where
    KI: WireValue,
    VI: WireValue,
    KO: WireValue,
    VO: WireValue,
{
    /// Resolve every codec from the built-in registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(&CodecRegistry::default())
    }

    /// Resolve every codec from `registry`.
    ///
    /// Denied types leave their codec unset; [`check`](Self::check) reports it
    /// unless the side is made keyless.
    #[must_use]
    pub fn with_registry(registry: &CodecRegistry) -> Self {
        Self {
            key_in: registry.resolve::<KI>().map(KeyIn::Keyed),
            value_in: registry.resolve::<VI>(),
            key_out: registry.resolve::<KO>().map(KeyOut::Keyed),
            value_out: registry.resolve::<VO>(),
            reporter: Reporter::default(),
        }
    }
}

impl<KI, VI, KO, VO> Default for Job<KI, VI, KO, VO>
where
    KI: WireValue,
    VI: WireValue,
    KO: WireValue,
    VO: WireValue,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<KI, VI, KO, VO> Job<KI, VI, KO, VO> {
    #[must_use]
    pub fn with_key_in_codec(mut self, codec: impl Codec<KI> + 'static) -> Self {
        self.key_in = Some(KeyIn::Keyed(Arc::new(codec)));
        self
    }

    #[must_use]
    pub fn with_value_in_codec(mut self, codec: impl Codec<VI> + 'static) -> Self {
        self.value_in = Some(Arc::new(codec));
        self
    }

    #[must_use]
    pub fn with_key_out_codec(mut self, codec: impl Codec<KO> + 'static) -> Self {
        self.key_out = Some(KeyOut::Keyed(Arc::new(codec)));
        self
    }

    #[must_use]
    pub fn with_value_out_codec(mut self, codec: impl Codec<VO> + 'static) -> Self {
        self.value_out = Some(Arc::new(codec));
        self
    }

    /// Input lines carry only a value; every record's key is `KI::default()`.
    #[must_use]
    pub fn keyless_input(mut self) -> Self
    where
        KI: Default,
    {
        self.key_in = Some(KeyIn::Keyless(KI::default));
        self
    }

    /// Output lines carry only a value.
    #[must_use]
    pub fn keyless_output(mut self) -> Self {
        self.key_out = Some(KeyOut::Keyless);
        self
    }

    /// Send counter and status lines to `reporter` instead of stderr.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Fail with a configuration error if any required codec is missing.
    pub fn check(&self) -> StreamResult<()> {
        required::<_, KI>(self.key_in.as_ref(), "input key")?;
        required::<_, VI>(self.value_in.as_ref(), "input value")?;
        required::<_, KO>(self.key_out.as_ref(), "output key")?;
        required::<_, VO>(self.value_out.as_ref(), "output value")?;
        Ok(())
    }

    /// Validate the codecs and build the input engine and output context.
    pub fn open(
        self,
        input: impl BufRead + 'static,
        output: impl Write + 'static,
    ) -> StreamResult<(GroupingEngine<KI, VI>, Context<KO, VO>)>
    where
        KI: PartialEq,
    {
        let key_in = required::<_, KI>(self.key_in, "input key")?;
        let value_in = required::<_, VI>(self.value_in, "input value")?;
        let key_out = required::<_, KO>(self.key_out, "output key")?;
        let value_out = required::<_, VO>(self.value_out, "output value")?;
        debug!(
            keyed_input = matches!(key_in, KeyIn::Keyed(_)),
            keyed_output = key_out.is_keyed(),
            "codecs resolved"
        );
        let decoder = RecordDecoder::new(Box::new(input), key_in, value_in);
        let encoder = RecordEncoder::new(Box::new(output), key_out, value_out);
        Ok((GroupingEngine::new(decoder), Context::new(encoder, self.reporter)))
    }

    /// Run `mapper` over `input`, writing records to `output`.
    ///
    /// The output is flushed once before returning, on every path.
    pub fn run_mapper<M>(
        self,
        mapper: &mut M,
        input: impl BufRead + 'static,
        output: impl Write + 'static,
    ) -> Result<()>
    where
        M: Mapper<KI, VI, KO, VO> + ?Sized,
        KI: PartialEq,
    {
        let (mut engine, mut ctx) = self.open(input, output)?;
        runner::run_mapper(mapper, &mut engine, &mut ctx)
    }

    /// Run `reducer` over the key-sorted `input`, writing records to `output`.
    pub fn run_reducer<R>(
        self,
        reducer: &mut R,
        input: impl BufRead + 'static,
        output: impl Write + 'static,
    ) -> Result<()>
    where
        R: Reducer<KI, VI, KO, VO> + ?Sized,
        KI: Clone + PartialEq,
    {
        let (mut engine, mut ctx) = self.open(input, output)?;
        runner::run_reducer(reducer, &mut engine, &mut ctx)
    }
}

// `T` names the value type in the error message.
fn required<C, T>(codec: Option<C>, role: &str) -> StreamResult<C> {
    codec.ok_or_else(|| {
        StreamingError::config(format!("no codec for {role} type {}", type_name::<T>()))
    })
}
