//! Execution loop shared by map and reduce tasks.
//!
//! Both loops follow the same lifecycle:
//! 1. `setup`; a failure skips the record loop but not cleanup
//! 2. read records (or groups) and hand them to the handler; a read failure
//!    goes to the handler's `on_read_error`, which either lets the loop carry
//!    on from the current position or stops it; a handler failure stops it
//! 3. `cleanup`, always exactly once
//! 4. flush the output, always exactly once
//!
//! The stopping error, the cleanup error and the flush error are merged with
//! [`merge_errors`] into the reported outcome.

use crate::context::Context;
use crate::error::merge_errors;
use crate::grouping::GroupingEngine;
use crate::mapper::Mapper;
use crate::reducer::Reducer;
use anyhow::Result;
use tracing::{debug, warn};

/// Drive `mapper` over every record of `engine`.
pub fn run_mapper<M, KI, VI, KO, VO>(
    mapper: &mut M,
    engine: &mut GroupingEngine<KI, VI>,
    ctx: &mut Context<KO, VO>,
) -> Result<()>
where
    M: Mapper<KI, VI, KO, VO> + ?Sized,
    KI: PartialEq,
{
    debug!("mapper setup");
    let stopped = match mapper.setup(ctx) {
        Ok(()) => map_records(mapper, engine, ctx).err(),
        Err(err) => Some(err),
    };
    debug!(failed = stopped.is_some(), "mapper cleanup");
    let cleanup = mapper.cleanup(ctx).err();
    finish("mapper", stopped, cleanup, engine, ctx)
}

fn map_records<M, KI, VI, KO, VO>(
    mapper: &mut M,
    engine: &mut GroupingEngine<KI, VI>,
    ctx: &mut Context<KO, VO>,
) -> Result<()>
where
    M: Mapper<KI, VI, KO, VO> + ?Sized,
    KI: PartialEq,
{
    loop {
        let record = match engine.next_record() {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(()),
            Err(err) => {
                warn!(error = %err, line = engine.lines_read(), "failed to read record");
                mapper.on_read_error(err, ctx)?;
                continue;
            }
        };
        mapper.map(record.key, record.value, ctx)?;
    }
}

/// Drive `reducer` over every group of `engine`.
pub fn run_reducer<R, KI, VI, KO, VO>(
    reducer: &mut R,
    engine: &mut GroupingEngine<KI, VI>,
    ctx: &mut Context<KO, VO>,
) -> Result<()>
where
    R: Reducer<KI, VI, KO, VO> + ?Sized,
    KI: Clone + PartialEq,
{
    debug!("reducer setup");
    let stopped = match reducer.setup(ctx) {
        Ok(()) => reduce_groups(reducer, engine, ctx).err(),
        Err(err) => Some(err),
    };
    debug!(failed = stopped.is_some(), groups = engine.groups(), "reducer cleanup");
    let cleanup = reducer.cleanup(ctx).err();
    finish("reducer", stopped, cleanup, engine, ctx)
}

fn reduce_groups<R, KI, VI, KO, VO>(
    reducer: &mut R,
    engine: &mut GroupingEngine<KI, VI>,
    ctx: &mut Context<KO, VO>,
) -> Result<()>
where
    R: Reducer<KI, VI, KO, VO> + ?Sized,
    KI: Clone + PartialEq,
{
    loop {
        let err = match engine.next_group() {
            Ok(Some((key, values))) => {
                reducer.reduce(key, values, ctx)?;
                continue;
            }
            Ok(None) => return Ok(()),
            Err(err) => err,
        };
        warn!(error = %err, line = engine.lines_read(), "failed to read group");
        reducer.on_read_error(err, ctx)?;
        engine.reset();
    }
}

fn finish<KI, VI, KO, VO>(
    role: &'static str,
    stopped: Option<anyhow::Error>,
    cleanup: Option<anyhow::Error>,
    engine: &GroupingEngine<KI, VI>,
    ctx: &mut Context<KO, VO>,
) -> Result<()>
where
    KI: PartialEq,
{
    let flushed = ctx.flush().err().map(anyhow::Error::from);
    debug!(
        role,
        lines_read = engine.lines_read(),
        records_written = ctx.records_written(),
        "task finished"
    );
    merge_errors([stopped, cleanup, flushed])
}
