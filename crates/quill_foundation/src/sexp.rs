//! The canonical text form of values.
//!
//! Every value renders through [`Sexp`]. The output is what REPL printers and
//! debuggers show, so the rules below are fixed:
//!
//! | value               | form                                      |
//! |---------------------|-------------------------------------------|
//! | `()` / End / Marker | `()` / `End` / `Marker`                   |
//! | list                | `(1 2)`, dotted tail as `(1 \ 2)`         |
//! | array               | `[1 2]`                                   |
//! | anonymous map       | `{k v k v}` in bucket order (unspecified) |
//! | named record        | ` (Name k:v k:v)` in key order            |
//! | char                | `#a`, `#\n`                               |
//! | string              | `"hi"` with escapes                       |
//! | float               | 5 significant digits, `%g` style          |
//! | function            | its defining expression, else `fn [name]` |
//! | error               | the bare message                          |
//! | stack mark          | `stackmark name`                          |
//!
//! # Example
//!
//! ```
//! use quill_foundation::{Sexp, Value, cons};
//!
//! let list = cons(Value::Int(1), cons(Value::Int(2), Value::NULL));
//! assert_eq!(list.sexp_string(), "(1 2)");
//! assert_eq!(cons(Value::Int(1), Value::Int(2)).sexp_string(), "(1 \\ 2)");
//! ```

use std::fmt::{self, Write};

use unicode_general_category::{GeneralCategory, get_general_category};

use crate::array::Array;
use crate::config::{FloatBits, FormatConfig};
use crate::error::Error;
use crate::function::Function;
use crate::pair::Pair;
use crate::record::Record;
use crate::symbol::Symbol;
use crate::value::{Sentinel, Value};

/// The text serialization protocol.
pub trait Sexp {
    /// Appends the form of `self` to `out`.
    fn write_sexp(&self, out: &mut String, config: &FormatConfig);

    /// Renders the canonical form.
    fn sexp_string(&self) -> String {
        self.sexp_string_with(&FormatConfig::default())
    }

    /// Renders with a custom configuration.
    fn sexp_string_with(&self, config: &FormatConfig) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out, config);
        out
    }
}

impl Sexp for Value {
    fn write_sexp(&self, out: &mut String, config: &FormatConfig) {
        Printer::new(out, config).run(Step::Value(self));
    }
}

impl Sexp for Sentinel {
    fn write_sexp(&self, out: &mut String, _config: &FormatConfig) {
        out.push_str(sentinel_text(*self));
    }
}

impl Sexp for Pair {
    fn write_sexp(&self, out: &mut String, config: &FormatConfig) {
        Printer::new(out, config).run(Step::Pair(self));
    }
}

impl Sexp for Array {
    fn write_sexp(&self, out: &mut String, config: &FormatConfig) {
        Printer::new(out, config).run(Step::Array(self));
    }
}

impl Sexp for Record {
    fn write_sexp(&self, out: &mut String, config: &FormatConfig) {
        Printer::new(out, config).run(Step::Record(self));
    }
}

impl Sexp for Symbol {
    fn write_sexp(&self, out: &mut String, _config: &FormatConfig) {
        out.push_str(self.name());
    }
}

impl Sexp for Function {
    fn write_sexp(&self, out: &mut String, config: &FormatConfig) {
        Printer::new(out, config).run(Step::Function(self));
    }
}

impl Sexp for Error {
    fn write_sexp(&self, out: &mut String, _config: &FormatConfig) {
        let _ = write!(out, "{self}");
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sexp_string())
    }
}

const fn sentinel_text(sentinel: Sentinel) -> &'static str {
    match sentinel {
        Sentinel::Null => "()",
        Sentinel::End => "End",
        Sentinel::Marker => "Marker",
    }
}

/// A pending unit of output.
///
/// Containers expand into their pieces on the work stack, so nesting depth
/// costs heap, not call stack.
#[derive(Clone, Copy)]
enum Step<'v> {
    Value(&'v Value),
    Pair(&'v Pair),
    Array(&'v Array),
    Record(&'v Record),
    Function(&'v Function),
    /// A named-record key: strings and symbols print as bare text.
    Key(&'v Value),
    Text(&'v str),
}

/// Printer state.
struct Printer<'a> {
    output: &'a mut String,
    config: &'a FormatConfig,
}

impl<'a> Printer<'a> {
    fn new(output: &'a mut String, config: &'a FormatConfig) -> Self {
        Self { output, config }
    }

    fn run(&mut self, start: Step<'_>) {
        let mut pending = vec![start];
        while let Some(step) = pending.pop() {
            let expanded = match step {
                Step::Text(text) => {
                    self.output.push_str(text);
                    continue;
                }
                Step::Key(Value::String(s)) => {
                    self.output.push_str(s);
                    continue;
                }
                Step::Key(Value::Symbol(sym)) => {
                    self.output.push_str(sym.name());
                    continue;
                }
                Step::Key(value) | Step::Value(value) => match value {
                    Value::Pair(pair) => pair_steps(pair),
                    Value::Array(arr) => array_steps(arr),
                    Value::Record(rec) => record_steps(rec),
                    Value::Function(func) => function_steps(func),
                    atom => {
                        self.print_atom(atom);
                        continue;
                    }
                },
                Step::Pair(pair) => pair_steps(pair),
                Step::Array(arr) => array_steps(arr),
                Step::Record(rec) => record_steps(rec),
                Step::Function(func) => function_steps(func),
            };
            pending.extend(expanded.into_iter().rev());
        }
    }

    fn print_atom(&mut self, value: &Value) {
        match value {
            Value::Sentinel(s) => self.output.push_str(sentinel_text(*s)),
            Value::Int(n) => {
                let _ = write!(self.output, "{n}");
            }
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Float(x) => format_float(self.output, *x, self.config),
            Value::Char(c) => self.print_char(*c),
            Value::String(s) => self.print_string(s),
            Value::Raw(bytes) => self.print_raw(bytes),
            Value::Symbol(sym) => self.output.push_str(sym.name()),
            Value::Error(err) => err.write_sexp(self.output, self.config),
            Value::Foreign(foreign) => {
                let _ = write!(self.output, "#<foreign {foreign:?}>");
            }
            Value::StackMark(sym) => {
                self.output.push_str("stackmark ");
                self.output.push_str(sym.name());
            }
            Value::Pair(_) | Value::Array(_) | Value::Record(_) | Value::Function(_) => {
                unreachable!("containers are expanded before printing")
            }
        }
    }

    fn print_char(&mut self, c: char) {
        let mut quoted = String::new();
        push_escaped(&mut quoted, c, '\'');
        self.output.push('#');
        self.output.push_str(quoted.trim_matches('\''));
    }

    fn print_string(&mut self, s: &str) {
        self.output.push('"');
        for c in s.chars() {
            push_escaped(self.output, c, '"');
        }
        self.output.push('"');
    }

    fn print_raw(&mut self, bytes: &[u8]) {
        self.output.push_str("#raw[");
        for (i, b) in bytes.iter().enumerate() {
            if i > 0 {
                self.output.push(' ');
            }
            let _ = write!(self.output, "{b:02x}");
        }
        self.output.push(']');
    }
}

// The tail chain is flattened here; heads stay on the work stack.
fn pair_steps(pair: &Pair) -> Vec<Step<'_>> {
    let mut steps = vec![Step::Text("(")];
    let mut current = pair;
    loop {
        steps.push(Step::Value(&current.head));
        match &current.tail {
            Value::Pair(next) => {
                steps.push(Step::Text(" "));
                current = &**next;
            }
            tail if tail.is_null() => break,
            tail => {
                steps.push(Step::Text(" \\ "));
                steps.push(Step::Value(tail));
                break;
            }
        }
    }
    steps.push(Step::Text(")"));
    steps
}

fn array_steps(arr: &Array) -> Vec<Step<'_>> {
    let mut steps = Vec::with_capacity(arr.len() * 2 + 2);
    steps.push(Step::Text("["));
    for (i, item) in arr.iter().enumerate() {
        if i > 0 {
            steps.push(Step::Text(" "));
        }
        steps.push(Step::Value(item));
    }
    steps.push(Step::Text("]"));
    steps
}

fn record_steps(rec: &Record) -> Vec<Step<'_>> {
    let mut steps = Vec::with_capacity(rec.len() * 4 + 3);
    if rec.is_anonymous() {
        steps.push(Step::Text("{"));
        for (i, (key, value)) in rec.iter_buckets().enumerate() {
            if i > 0 {
                steps.push(Step::Text(" "));
            }
            steps.extend([Step::Value(key), Step::Text(" "), Step::Value(value)]);
        }
        steps.push(Step::Text("}"));
    } else {
        steps.extend([Step::Text(" ("), Step::Text(rec.type_name())]);
        for (key, value) in rec {
            steps.extend([
                Step::Text(" "),
                Step::Key(key),
                Step::Text(":"),
                Step::Value(value),
            ]);
        }
        steps.push(Step::Text(")"));
    }
    steps
}

fn function_steps(func: &Function) -> Vec<Step<'_>> {
    match func.original() {
        Some(expr) => vec![Step::Value(expr)],
        None => vec![Step::Text("fn ["), Step::Text(func.name()), Step::Text("]")],
    }
}

/// Letters, marks, numbers, punctuation, symbols and the ASCII space.
fn is_printable(c: char) -> bool {
    c == ' '
        || !matches!(
            get_general_category(c),
            GeneralCategory::Control
                | GeneralCategory::Format
                | GeneralCategory::Surrogate
                | GeneralCategory::PrivateUse
                | GeneralCategory::Unassigned
                | GeneralCategory::SpaceSeparator
                | GeneralCategory::LineSeparator
                | GeneralCategory::ParagraphSeparator
        )
}

fn push_escaped(out: &mut String, c: char, quote: char) {
    match c {
        '\x07' => out.push_str("\\a"),
        '\x08' => out.push_str("\\b"),
        '\x0c' => out.push_str("\\f"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\x0b' => out.push_str("\\v"),
        '\\' => out.push_str("\\\\"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if !is_printable(c) => {
            let code = u32::from(c);
            if code < 0x20 || code == 0x7f {
                let _ = write!(out, "\\x{code:02x}");
            } else if code < 0x1_0000 {
                let _ = write!(out, "\\u{code:04x}");
            } else {
                let _ = write!(out, "\\U{code:08x}");
            }
        }
        c => out.push(c),
    }
}

/// Writes `x` in `%g` style with `config.float_precision` significant digits.
///
/// Scientific notation is used when the decimal exponent is below -4 or
/// reaches the precision; trailing zeros are dropped either way.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn format_float(out: &mut String, x: f64, config: &FormatConfig) {
    let precision = config.float_precision.max(1);
    let scientific = match config.float_bits {
        FloatBits::F32 => {
            let narrowed = x as f32;
            if !narrowed.is_finite() {
                push_non_finite(out, f64::from(narrowed));
                return;
            }
            format!("{:.*e}", precision - 1, narrowed)
        }
        FloatBits::F64 => {
            if !x.is_finite() {
                push_non_finite(out, x);
                return;
            }
            format!("{:.*e}", precision - 1, x)
        }
    };

    // `scientific` looks like "-1.2346e8": sign, rounded mantissa, exponent.
    let (negative, body) = match scientific.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, scientific.as_str()),
    };
    let (mantissa, exponent) = body.split_once('e').unwrap_or((body, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let mut digits: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
    while digits.last() == Some(&b'0') {
        digits.pop();
    }

    let nd = digits.len() as i32;
    // Position of the decimal point relative to the first digit.
    let dp = if nd == 0 { 0 } else { exponent + 1 };
    let mut prec = precision as i32;

    if negative {
        out.push('-');
    }

    let mut eprec = prec;
    if eprec > nd && nd >= dp {
        eprec = nd;
    }
    let exp = dp - 1;
    if exp < -4 || exp >= eprec {
        if prec > nd {
            prec = nd;
        }
        push_exponential(out, &digits, prec - 1, exp);
    } else {
        if prec > dp {
            prec = nd;
        }
        push_fixed(out, &digits, (prec - dp).max(0), dp);
    }
}

fn digit_at(digits: &[u8], index: i32) -> char {
    usize::try_from(index)
        .ok()
        .and_then(|i| digits.get(i))
        .map_or('0', |&d| char::from(d))
}

fn push_exponential(out: &mut String, digits: &[u8], decimals: i32, exp: i32) {
    out.push(digit_at(digits, 0));
    if decimals > 0 {
        out.push('.');
        for i in 1..=decimals {
            out.push(digit_at(digits, i));
        }
    }
    let exp = if digits.is_empty() { 0 } else { exp };
    let sign = if exp < 0 { '-' } else { '+' };
    let _ = write!(out, "e{sign}{:02}", exp.abs());
}

fn push_fixed(out: &mut String, digits: &[u8], decimals: i32, dp: i32) {
    if dp > 0 {
        for i in 0..dp {
            out.push(digit_at(digits, i));
        }
    } else {
        out.push('0');
    }
    if decimals > 0 {
        out.push('.');
        for i in 0..decimals {
            out.push(digit_at(digits, dp + i));
        }
    }
}

fn push_non_finite(out: &mut String, x: f64) {
    out.push_str(if x.is_nan() {
        "NaN"
    } else if x > 0.0 {
        "+Inf"
    } else {
        "-Inf"
    });
}
