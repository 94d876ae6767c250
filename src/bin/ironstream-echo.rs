//! Identity worker: copies every record from stdin to stdout through the
//! codecs of the chosen value type.
//!
//! ```text
//! printf '1\n2\n' | ironstream-echo --type int
//! printf 'a\t1\na\t2\n' | ironstream-echo --key --type int --reducer
//! ```

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use ironstream::app::{Application, Role, StreamingArgs, report};
use ironstream::codec::WireValue;
use ironstream::job::Job;
use ironstream::mapper::IdentityMapper;
use ironstream::policy::ReadErrorPolicy;
use ironstream::reducer::IdentityReducer;
use ironstream::utils::{Complex32, Complex64};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum WireType {
    Bool,
    String,
    /// 64-bit signed integer
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    /// 64-bit unsigned integer
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    /// Complex number with 32-bit parts
    Complex64,
    /// Complex number with 64-bit parts
    Complex128,
    /// JSON object
    Map,
    /// JSON array
    Array,
}

/// Echo records unchanged, exercising the codec of one value type
#[derive(Parser, Debug)]
#[command(name = "ironstream-echo", version, about)]
struct Cli {
    /// Lines carry a string key before a tab
    #[arg(long)]
    key: bool,

    /// Value type records are decoded into
    #[arg(long = "type", value_enum, default_value = "string")]
    value_type: WireType,

    /// Skip unreadable lines instead of failing
    #[arg(long)]
    skip_err: bool,

    #[command(flatten)]
    streaming: StreamingArgs,
}

macro_rules! for_wire_type {
    ($ty:expr, $echo:ident, $role:expr, $policy:expr) => {
        match $ty {
            WireType::Bool => $echo::<bool>($role, $policy),
            WireType::String => $echo::<String>($role, $policy),
            WireType::Int | WireType::Int64 => $echo::<i64>($role, $policy),
            WireType::Int8 => $echo::<i8>($role, $policy),
            WireType::Int16 => $echo::<i16>($role, $policy),
            WireType::Int32 => $echo::<i32>($role, $policy),
            WireType::Uint | WireType::Uint64 => $echo::<u64>($role, $policy),
            WireType::Uint8 => $echo::<u8>($role, $policy),
            WireType::Uint16 => $echo::<u16>($role, $policy),
            WireType::Uint32 => $echo::<u32>($role, $policy),
            WireType::Float32 => $echo::<f32>($role, $policy),
            WireType::Float64 => $echo::<f64>($role, $policy),
            WireType::Complex64 => $echo::<Complex32>($role, $policy),
            WireType::Complex128 => $echo::<Complex64>($role, $policy),
            WireType::Map => $echo::<Map<String, Value>>($role, $policy),
            WireType::Array => $echo::<Vec<Value>>($role, $policy),
        }
    };
}

fn echo<K, V>(job: Job<K, V, K, V>, role: Role, policy: ReadErrorPolicy) -> Result<()>
where
    K: Clone + PartialEq,
{
    let input = io::stdin().lock();
    let output = io::stdout();
    match role {
        Role::Mapper => job.run_mapper(&mut IdentityMapper::new(policy), input, output),
        Role::Reducer => job.run_reducer(&mut IdentityReducer::new(policy), input, output),
    }
}

fn echo_keyed<V: WireValue>(role: Role, policy: ReadErrorPolicy) -> Result<()> {
    echo(Job::<String, V, String, V>::new(), role, policy)
}

fn echo_keyless<V: WireValue>(role: Role, policy: ReadErrorPolicy) -> Result<()> {
    echo(
        Job::<(), V, (), V>::new().keyless_input().keyless_output(),
        role,
        policy,
    )
}

fn dispatch(cli: &Cli, role: Role) -> Result<()> {
    let policy = ReadErrorPolicy::skipping(cli.skip_err);
    if cli.key {
        for_wire_type!(cli.value_type, echo_keyed, role, policy)
    } else {
        for_wire_type!(cli.value_type, echo_keyless, role, policy)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let app = Application::new()
        .with_mapper(|| dispatch(&cli, Role::Mapper))
        .with_reducer(|| dispatch(&cli, Role::Reducer));
    report(app.run_with(&cli.streaming))
}
