//! Fluent construction of wire-format input.

use std::fmt::Display;

/// Builds input text one line at a time.
///
/// ```
/// use ironstream::testing::WireBuilder;
///
/// let input = WireBuilder::new()
///     .record("a", 1)
///     .repeated("b", 2, 2)
///     .blank()
///     .value("lone")
///     .build();
///
/// assert_eq!(input, "a\t1\nb\t2\nb\t2\n\nlone\n");
/// ```
#[derive(Default)]
pub struct WireBuilder {
    lines: Vec<String>,
    terminated: bool,
}

impl WireBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            terminated: true,
        }
    }

    /// Add a raw line, without terminator.
    #[must_use]
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Add a `key<TAB>value` line.
    #[must_use]
    pub fn record(self, key: impl Display, value: impl Display) -> Self {
        self.line(format!("{key}\t{value}"))
    }

    /// Add a keyless line.
    #[must_use]
    pub fn value(self, value: impl Display) -> Self {
        self.line(value.to_string())
    }

    /// Add the same record `count` times.
    #[must_use]
    pub fn repeated(mut self, key: impl Display, value: impl Display, count: usize) -> Self {
        let line = format!("{key}\t{value}");
        self.lines.extend(std::iter::repeat_n(line, count));
        self
    }

    /// Add one record per value, all under `key`.
    #[must_use]
    pub fn group<V: Display>(mut self, key: impl Display, values: impl IntoIterator<Item = V>) -> Self {
        for v in values {
            self.lines.push(format!("{key}\t{v}"));
        }
        self
    }

    #[must_use]
    pub fn blank(self) -> Self {
        self.line(String::new())
    }

    /// Leave the last line without its `\n`.
    #[must_use]
    pub fn unterminated(mut self) -> Self {
        self.terminated = false;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn build(self) -> String {
        let mut text = self.lines.join("\n");
        if self.terminated && !self.lines.is_empty() {
            text.push('\n');
        }
        text
    }
}
