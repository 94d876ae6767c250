//! Map-side handlers.

use crate::context::Context;
use crate::error::StreamingError;
use crate::policy::ReadErrorPolicy;
use anyhow::Result;
use std::marker::PhantomData;

/// User logic for the map phase.
///
/// Only [`map`](Mapper::map) is required. `on_read_error` decides whether a
/// record that failed to read is survivable: return `Ok(())` to skip it and
/// keep reading, or an error to stop. The default stops.
pub trait Mapper<KI, VI, KO, VO> {
    fn setup(&mut self, _ctx: &mut Context<KO, VO>) -> Result<()> {
        Ok(())
    }

    fn map(&mut self, key: KI, value: VI, ctx: &mut Context<KO, VO>) -> Result<()>;

    fn cleanup(&mut self, _ctx: &mut Context<KO, VO>) -> Result<()> {
        Ok(())
    }

    fn on_read_error(&mut self, err: StreamingError, _ctx: &mut Context<KO, VO>) -> Result<()> {
        Err(err.into())
    }
}

/// A mapper built from a closure.
///
/// ```
/// use ironstream::mapper::FnMapper;
/// use ironstream::context::Context;
///
/// let upper = FnMapper::new(|k: String, v: String, ctx: &mut Context<String, String>| {
///     ctx.write(&k, &v.to_uppercase())?;
///     Ok(())
/// });
/// ```
pub struct FnMapper<F, KI, VI, KO, VO> {
    f: F,
    policy: ReadErrorPolicy,
    _types: PhantomData<fn(KI, VI) -> (KO, VO)>,
}

impl<F, KI, VI, KO, VO> FnMapper<F, KI, VI, KO, VO>
where
    F: FnMut(KI, VI, &mut Context<KO, VO>) -> Result<()>,
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

impl<F, KI, VI, KO, VO> Mapper<KI, VI, KO, VO> for FnMapper<F, KI, VI, KO, VO>
where
    F: FnMut(KI, VI, &mut Context<KO, VO>) -> Result<()>,
{
    fn map(&mut self, key: KI, value: VI, ctx: &mut Context<KO, VO>) -> Result<()> {
        (self.f)(key, value, ctx)
    }

    fn on_read_error(&mut self, err: StreamingError, ctx: &mut Context<KO, VO>) -> Result<()> {
        self.policy.recover(err, ctx)
    }
}

/// Writes every input record unchanged.
pub struct IdentityMapper<K, V> {
    policy: ReadErrorPolicy,
    _types: PhantomData<fn(K, V)>,
}

impl<K, V> IdentityMapper<K, V> {
    #[must_use]
    pub fn new(policy: ReadErrorPolicy) -> Self {
        Self {
            policy,
            _types: PhantomData,
        }
    }
}

impl<K, V> Default for IdentityMapper<K, V> {
    fn default() -> Self {
        Self::new(ReadErrorPolicy::default())
    }
}

impl<K, V> Mapper<K, V, K, V> for IdentityMapper<K, V> {
    fn map(&mut self, key: K, value: V, ctx: &mut Context<K, V>) -> Result<()> {
        ctx.write(&key, &value)?;
        Ok(())
    }

    fn on_read_error(&mut self, err: StreamingError, ctx: &mut Context<K, V>) -> Result<()> {
        self.policy.recover(err, ctx)
    }
}
