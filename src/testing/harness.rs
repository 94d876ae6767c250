use crate::job::Job;
use crate::mapper::Mapper;
use crate::reducer::Reducer;
use crate::reporter::Reporter;
use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

/// An in-memory writer whose contents stay readable after it is handed away.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    /// Contents as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// What a test run produced.
pub struct RunReport {
    /// Record output.
    pub output: String,
    /// Reporter side channel (counter and status lines).
    pub reports: String,
    pub result: anyhow::Result<()>,
}

impl RunReport {
    /// Output lines without terminators.
    #[must_use]
    pub fn output_lines(&self) -> Vec<&str> {
        self.output.lines().collect()
    }

    /// Reporter lines without terminators.
    #[must_use]
    pub fn report_lines(&self) -> Vec<&str> {
        self.reports.lines().collect()
    }
}

/// Run `mapper` over `input` with the codecs of `job`.
pub fn run_mapper_on<M, KI, VI, KO, VO>(job: Job<KI, VI, KO, VO>, mapper: &mut M, input: &str) -> RunReport
where
    M: Mapper<KI, VI, KO, VO> + ?Sized,
    KI: PartialEq,
{
    let output = SharedBuffer::new();
    let reports = SharedBuffer::new();
    let result = job
        .with_reporter(Reporter::new(reports.clone()))
        .run_mapper(mapper, cursor(input), output.clone());
    RunReport {
        output: output.text(),
        reports: reports.text(),
        result,
    }
}

/// Run `reducer` over `input` with the codecs of `job`.
pub fn run_reducer_on<R, KI, VI, KO, VO>(job: Job<KI, VI, KO, VO>, reducer: &mut R, input: &str) -> RunReport
where
    R: Reducer<KI, VI, KO, VO> + ?Sized,
    KI: Clone + PartialEq,
{
    let output = SharedBuffer::new();
    let reports = SharedBuffer::new();
    let result = job
        .with_reporter(Reporter::new(reports.clone()))
        .run_reducer(reducer, cursor(input), output.clone());
    RunReport {
        output: output.text(),
        reports: reports.text(),
        result,
    }
}

fn cursor(input: &str) -> Cursor<Vec<u8>> {
    Cursor::new(input.as_bytes().to_vec())
}
