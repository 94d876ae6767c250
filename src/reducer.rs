//! Reduce-side handlers.

use crate::context::Context;
use crate::error::StreamingError;
use crate::grouping::Values;
use crate::policy::ReadErrorPolicy;
use anyhow::Result;
use std::marker::PhantomData;

/// User logic for the reduce phase.
///
/// [`reduce`](Reducer::reduce) is called once per run of equal keys with a
/// lazy iterator over that run's values. Values left undrained are skipped
/// before the next group. Hook semantics otherwise match
/// [`Mapper`](crate::mapper::Mapper).
pub trait Reducer<KI, VI, KO, VO> {
    fn setup(&mut self, _ctx: &mut Context<KO, VO>) -> Result<()> {
        Ok(())
    }

    fn reduce(&mut self, key: KI, values: Values<'_, KI, VI>, ctx: &mut Context<KO, VO>)
        -> Result<()>;

    fn cleanup(&mut self, _ctx: &mut Context<KO, VO>) -> Result<()> {
        Ok(())
    }

    fn on_read_error(&mut self, err: StreamingError, _ctx: &mut Context<KO, VO>) -> Result<()> {
        Err(err.into())
    }
}

/// A reducer built from a closure.
///
/// ```
/// use ironstream::reducer::FnReducer;
/// use ironstream::context::Context;
/// use ironstream::grouping::Values;
///
/// let sum = FnReducer::new(
///     |k: String, values: Values<'_, String, u64>, ctx: &mut Context<String, u64>| {
///         ctx.write(&k, &values.sum())?;
///         Ok(())
///     },
/// );
/// ```
pub struct FnReducer<F, KI, VI, KO, VO> {
    f: F,
    policy: ReadErrorPolicy,
    _types: PhantomData<fn(KI, VI) -> (KO, VO)>,
}

impl<F, KI, VI, KO, VO> FnReducer<F, KI, VI, KO, VO>
where
    F: FnMut(KI, Values<'_, KI, VI>, &mut Context<KO, VO>) -> Result<()>,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            policy: ReadErrorPolicy::default(),
            _types: PhantomData,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ReadErrorPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl<F, KI, VI, KO, VO> Reducer<KI, VI, KO, VO> for FnReducer<F, KI, VI, KO, VO>
where
    F: FnMut(KI, Values<'_, KI, VI>, &mut Context<KO, VO>) -> Result<()>,
{
    fn reduce(
        &mut self,
        key: KI,
        values: Values<'_, KI, VI>,
        ctx: &mut Context<KO, VO>,
    ) -> Result<()> {
        (self.f)(key, values, ctx)
    }

    fn on_read_error(&mut self, err: StreamingError, ctx: &mut Context<KO, VO>) -> Result<()> {
        self.policy.recover(err, ctx)
    }
}

/// Writes every value of every group under its key.
pub struct IdentityReducer<K, V> {
    policy: ReadErrorPolicy,
    _types: PhantomData<fn(K, V)>,
}

impl<K, V> IdentityReducer<K, V> {
    #[must_use]
    pub fn new(policy: ReadErrorPolicy) -> Self {
        Self {
            policy,
            _types: PhantomData,
        }
    }
}

impl<K, V> Default for IdentityReducer<K, V> {
    fn default() -> Self {
        Self::new(ReadErrorPolicy::default())
    }
}

impl<K: PartialEq, V> Reducer<K, V, K, V> for IdentityReducer<K, V> {
    fn reduce(&mut self, key: K, values: Values<'_, K, V>, ctx: &mut Context<K, V>) -> Result<()> {
        for value in values {
            ctx.write(&key, &value)?;
        }
        Ok(())
    }

    fn on_read_error(&mut self, err: StreamingError, ctx: &mut Context<K, V>) -> Result<()> {
        self.policy.recover(err, ctx)
    }
}
