//! The ninja text writer and build-edge builder.

use std::fmt::Write as _;

/// Maximum line width before wrapping with a `$` continuation.
const WRAP_WIDTH: usize = 78;

/// Continuation indent for wrapped lines.
const WRAP_INDENT: &str = "    ";

/// Escapes a path for use in a ninja build line.
///
/// Spaces and colons have structural meaning on build lines and are escaped
/// with `$`. Bare `$` passes through so that variable references like
/// `$CXX` can appear as inputs.
pub fn escape_path(path: &str) -> String {
    path.replace("$ ", "$$ ")
        .replace(' ', "$ ")
        .replace(':', "$:")
}

/// One build statement: outputs, rule, inputs, and their implicit and
/// order-only variants, plus per-edge variable bindings.
#[derive(Debug, Default, Clone)]
pub struct BuildEdge {
    outputs: Vec<String>,
    implicit_outputs: Vec<String>,
    rule: String,
    inputs: Vec<String>,
    implicit: Vec<String>,
    order_only: Vec<String>,
    variables: Vec<(String, String)>,
}

impl BuildEdge {
    /// Starts an edge producing `output` with `rule`.
    pub fn new(output: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            outputs: vec![output.into()],
            rule: rule.into(),
            ..Self::default()
        }
    }

    /// Adds an explicit input.
    pub fn input(mut self, path: impl Into<String>) -> Self {
        self.inputs.push(path.into());
        self
    }

    /// Adds explicit inputs.
    pub fn inputs<I: Into<String>>(mut self, paths: impl IntoIterator<Item = I>) -> Self {
        self.inputs.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Adds an implicit input (a dependency that is not named on the
    /// command line).
    pub fn implicit(mut self, path: impl Into<String>) -> Self {
        self.implicit.push(path.into());
        self
    }

    /// Adds implicit inputs.
    pub fn implicits<I: Into<String>>(mut self, paths: impl IntoIterator<Item = I>) -> Self {
        self.implicit.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Adds an order-only input.
    pub fn order_only(mut self, path: impl Into<String>) -> Self {
        self.order_only.push(path.into());
        self
    }

    /// Adds order-only inputs.
    pub fn order_onlys<I: Into<String>>(mut self, paths: impl IntoIterator<Item = I>) -> Self {
        self.order_only.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Adds an implicit output (produced by the edge but not named as its
    /// target).
    pub fn implicit_output(mut self, path: impl Into<String>) -> Self {
        self.implicit_outputs.push(path.into());
        self
    }

    /// Binds a per-edge variable.
    pub fn variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.push((key.into(), value.into()));
        self
    }
}

/// Writes ninja syntax into an in-memory string.
#[derive(Debug, Default)]
pub struct NinjaWriter {
    out: String,
}

impl NinjaWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        // Not `Self::default()`: the inherent `default` method (the ninja
        // `default` statement) shadows the trait method.
        Self { out: String::new() }
    }

    /// Writes a `# comment` line (not wrapped).
    pub fn comment(&mut self, text: &str) {
        let _ = writeln!(self.out, "# {text}");
    }

    /// Writes a blank line.
    pub fn newline(&mut self) {
        self.out.push('\n');
    }

    /// Writes a top-level `key = value` binding.
    pub fn variable(&mut self, key: &str, value: &str) {
        self.wrapped_line(&format!("{key} = {value}"));
    }

    /// Writes the header every dyndep fragment must start with.
    pub fn dyndep_header(&mut self) {
        self.variable("ninja_dyndep_version", "1");
    }

    /// Writes a rule declaration with its command and any extra bindings
    /// (`description`, `depfile`, `deps`, `restat`, `generator`, ...).
    pub fn rule(&mut self, name: &str, command: &str, bindings: &[(&str, &str)]) {
        self.wrapped_line(&format!("rule {name}"));
        self.wrapped_line(&format!("  command = {command}"));
        for (key, value) in bindings {
            self.wrapped_line(&format!("  {key} = {value}"));
        }
    }

    /// Writes a build statement.
    pub fn build(&mut self, edge: &BuildEdge) {
        let mut line = String::from("build ");
        line.push_str(&join_paths(&edge.outputs));
        if !edge.implicit_outputs.is_empty() {
            line.push_str(" | ");
            line.push_str(&join_paths(&edge.implicit_outputs));
        }
        line.push_str(": ");
        line.push_str(&edge.rule);
        if !edge.inputs.is_empty() {
            line.push(' ');
            line.push_str(&join_paths(&edge.inputs));
        }
        if !edge.implicit.is_empty() {
            line.push_str(" | ");
            line.push_str(&join_paths(&edge.implicit));
        }
        if !edge.order_only.is_empty() {
            line.push_str(" || ");
            line.push_str(&join_paths(&edge.order_only));
        }
        self.wrapped_line(&line);
        for (key, value) in &edge.variables {
            self.wrapped_line(&format!("  {key} = {value}"));
        }
    }

    /// Writes a `default` statement.
    pub fn default(&mut self, targets: &[&str]) {
        self.wrapped_line(&format!("default {}", targets.join(" ")));
    }

    /// Consumes the writer, returning the accumulated text.
    pub fn into_string(self) -> String {
        self.out
    }

    /// Writes one logical line, wrapping at unescaped spaces with `$`
    /// continuations.
    fn wrapped_line(&mut self, text: &str) {
        let mut rest = text;
        let mut indent = "";
        while indent.len() + rest.len() > WRAP_WIDTH {
            // Room for the trailing " $".
            let available = WRAP_WIDTH - indent.len() - 2;
            let Some(space) = rightmost_unescaped_space(rest, available) else {
                break;
            };
            let _ = writeln!(self.out, "{indent}{} $", &rest[..space]);
            rest = &rest[space + 1..];
            indent = WRAP_INDENT;
        }
        let _ = writeln!(self.out, "{indent}{rest}");
    }
}

fn join_paths(paths: &[String]) -> String {
    paths
        .iter()
        .map(|p| escape_path(p))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Finds the rightmost space at or before `limit` that is not part of an
/// escaped `$ ` sequence, falling back to the first breakable space at all.
fn rightmost_unescaped_space(text: &str, limit: usize) -> Option<usize> {
    let breakable = |i: usize| i > 0 && !text[..i].ends_with('$');
    let bytes = text.as_bytes();
    let upper = limit.min(text.len().saturating_sub(1));
    for i in (1..=upper).rev() {
        if bytes[i] == b' ' && breakable(i) {
            return Some(i);
        }
    }
    (1..text.len()).find(|&i| bytes[i] == b' ' && breakable(i))
}
