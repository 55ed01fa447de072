//! Push-based incremental JSON value-builder.
//!
//! [`JsonStreamBuilder`] consumes raw text fragments of one growing JSON
//! document, not necessarily aligned to any structural boundary, and reports
//! the path of every value that resolves: completed scalars and containers,
//! plus every extension of an in-progress string value (partial tokens).
//! [`JsonStreamBuilder::snapshot`] materializes the current best-effort
//! partial document, including open containers and string prefixes.
//!
//! This is deliberately not a general-purpose parser: one document per
//! builder, strict JSON, and the only consumers are the streaming reducers
//! in this crate.

use serde_json::{Map, Number, Value};

use crate::error::{MocksmithError, Result};

/// One segment of a path into the document under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSeg {
    Key(String),
    Index(usize),
}

/// Path to a resolved value. Empty for the root itself.
pub type JsonPath = Vec<PathSeg>;

/// Container currently under construction.
enum Frame {
    Object {
        map: Map<String, Value>,
        /// Pending key: set once the key string closes, cleared when the
        /// corresponding value attaches.
        key: Option<String>,
    },
    Array {
        items: Vec<Value>,
    },
}

/// Scalar token currently under construction.
enum Scalar {
    None,
    Str {
        buf: String,
        escape: bool,
        /// Hex digits of an in-progress \uXXXX escape.
        unicode: Option<String>,
        /// First half of a surrogate pair, awaiting its low half.
        pending_surrogate: Option<u16>,
        is_key: bool,
    },
    Num {
        buf: String,
    },
    Lit {
        buf: String,
    },
}

/// What the grammar allows next, outside of any scalar token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Value { allow_end: bool },
    Key { allow_end: bool },
    Colon,
    CommaOrEnd,
    Done,
}

pub struct JsonStreamBuilder {
    stack: Vec<Frame>,
    scalar: Scalar,
    expect: Expect,
    root: Option<Value>,
    failed: bool,
}

impl Default for JsonStreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonStreamBuilder {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            scalar: Scalar::None,
            expect: Expect::Value { allow_end: false },
            root: None,
            failed: false,
        }
    }

    /// Feed one fragment. Returns the paths of all values resolved by this
    /// fragment, in resolution order: completed scalars/containers and
    /// partial extensions of in-progress string values.
    pub fn feed(&mut self, fragment: &str) -> Result<Vec<JsonPath>> {
        if self.failed {
            return Err(MocksmithError::Stream(
                "builder already failed; no further input accepted".to_string(),
            ));
        }
        let mut events = Vec::new();
        for c in fragment.chars() {
            let mut pending = Some(c);
            while let Some(c) = pending.take() {
                match self.step(c, &mut events) {
                    Ok(reprocess) => pending = reprocess,
                    Err(e) => {
                        self.failed = true;
                        return Err(e);
                    }
                }
            }
        }
        Ok(events)
    }

    /// The completed root document, if the stream has finished one.
    pub fn root(&self) -> Option<&Value> {
        self.root.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.root.is_some()
    }

    /// Best-effort partial document: open containers are included as-is,
    /// an in-progress string value as its current prefix. Incomplete
    /// numbers and literals are omitted.
    pub fn snapshot(&self) -> Value {
        if let Some(root) = &self.root {
            return root.clone();
        }
        let mut current = match &self.scalar {
            Scalar::Str { buf, is_key: false, .. } => Some(Value::String(buf.clone())),
            _ => None,
        };
        for frame in self.stack.iter().rev() {
            current = Some(match frame {
                Frame::Object { map, key } => {
                    let mut m = map.clone();
                    if let (Some(k), Some(v)) = (key, current.take()) {
                        m.insert(k.clone(), v);
                    }
                    Value::Object(m)
                }
                Frame::Array { items } => {
                    let mut it = items.clone();
                    if let Some(v) = current.take() {
                        it.push(v);
                    }
                    Value::Array(it)
                }
            });
        }
        current.unwrap_or(Value::Null)
    }

    /// Process one character. `Ok(Some(c))` asks the caller to re-run `c`
    /// (a number token is only delimited by the character after it).
    ///
    /// The in-progress scalar is taken out of `self` by value so the path
    /// helpers can borrow the container stack while the token mutates.
    fn step(&mut self, c: char, events: &mut Vec<JsonPath>) -> Result<Option<char>> {
        match std::mem::replace(&mut self.scalar, Scalar::None) {
            Scalar::Str {
                mut buf,
                mut escape,
                mut unicode,
                mut pending_surrogate,
                is_key,
            } => {
                if let Some(mut hex) = unicode.take() {
                    if !c.is_ascii_hexdigit() {
                        return Err(stream_err(c, "unicode escape"));
                    }
                    hex.push(c);
                    if hex.len() < 4 {
                        unicode = Some(hex);
                    } else {
                        let code = u16::from_str_radix(&hex, 16).expect("hex digits");
                        match (pending_surrogate, code) {
                            (Some(high), 0xDC00..=0xDFFF) => {
                                let combined = 0x10000
                                    + ((u32::from(high) - 0xD800) << 10)
                                    + (u32::from(code) - 0xDC00);
                                buf.push(char::from_u32(combined).unwrap_or('\u{FFFD}'));
                                pending_surrogate = None;
                            }
                            (high, 0xD800..=0xDBFF) => {
                                if high.is_some() {
                                    buf.push('\u{FFFD}');
                                }
                                pending_surrogate = Some(code);
                            }
                            (high, _) => {
                                if high.is_some() {
                                    buf.push('\u{FFFD}');
                                    pending_surrogate = None;
                                }
                                buf.push(char::from_u32(u32::from(code)).unwrap_or('\u{FFFD}'));
                            }
                        }
                        if !is_key && pending_surrogate.is_none() {
                            events.push(self.child_path());
                        }
                    }
                    self.scalar = Scalar::Str {
                        buf,
                        escape,
                        unicode,
                        pending_surrogate,
                        is_key,
                    };
                    return Ok(None);
                }
                if escape {
                    escape = false;
                    match c {
                        '"' | '\\' | '/' => buf.push(c),
                        'b' => buf.push('\u{0008}'),
                        'f' => buf.push('\u{000C}'),
                        'n' => buf.push('\n'),
                        'r' => buf.push('\r'),
                        't' => buf.push('\t'),
                        'u' => unicode = Some(String::with_capacity(4)),
                        _ => return Err(stream_err(c, "escape sequence")),
                    }
                    if !is_key && c != 'u' {
                        events.push(self.child_path());
                    }
                    self.scalar = Scalar::Str {
                        buf,
                        escape,
                        unicode,
                        pending_surrogate,
                        is_key,
                    };
                    return Ok(None);
                }
                match c {
                    '\\' => {
                        self.scalar = Scalar::Str {
                            buf,
                            escape: true,
                            unicode,
                            pending_surrogate,
                            is_key,
                        };
                    }
                    '"' => {
                        if pending_surrogate.is_some() {
                            buf.push('\u{FFFD}');
                        }
                        if is_key {
                            match self.stack.last_mut() {
                                Some(Frame::Object { key, .. }) => *key = Some(buf),
                                _ => {
                                    return Err(MocksmithError::Stream(
                                        "key outside of object".to_string(),
                                    ))
                                }
                            }
                            self.expect = Expect::Colon;
                        } else {
                            self.attach(Value::String(buf), events);
                        }
                    }
                    _ => {
                        buf.push(c);
                        if !is_key {
                            events.push(self.child_path());
                        }
                        self.scalar = Scalar::Str {
                            buf,
                            escape,
                            unicode,
                            pending_surrogate,
                            is_key,
                        };
                    }
                }
                Ok(None)
            }
            Scalar::Num { mut buf } => {
                if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                    buf.push(c);
                    self.scalar = Scalar::Num { buf };
                    return Ok(None);
                }
                let number = parse_number(&buf)?;
                self.attach(Value::Number(number), events);
                Ok(Some(c))
            }
            Scalar::Lit { mut buf } => {
                buf.push(c);
                match buf.as_str() {
                    "true" => self.attach(Value::Bool(true), events),
                    "false" => self.attach(Value::Bool(false), events),
                    "null" => self.attach(Value::Null, events),
                    partial if is_literal_prefix(partial) => {
                        self.scalar = Scalar::Lit { buf };
                    }
                    other => {
                        return Err(MocksmithError::Stream(format!(
                            "invalid literal '{other}' in JSON stream"
                        )))
                    }
                }
                Ok(None)
            }
            Scalar::None => self.step_structural(c, events),
        }
    }

    fn step_structural(&mut self, c: char, events: &mut Vec<JsonPath>) -> Result<Option<char>> {
        if c.is_whitespace() {
            return Ok(None);
        }
        match self.expect {
            Expect::Value { allow_end } => match c {
                '"' => {
                    self.scalar = Scalar::Str {
                        buf: String::new(),
                        escape: false,
                        unicode: None,
                        pending_surrogate: None,
                        is_key: false,
                    };
                    Ok(None)
                }
                '{' => {
                    self.stack.push(Frame::Object {
                        map: Map::new(),
                        key: None,
                    });
                    self.expect = Expect::Key { allow_end: true };
                    Ok(None)
                }
                '[' => {
                    self.stack.push(Frame::Array { items: Vec::new() });
                    self.expect = Expect::Value { allow_end: true };
                    Ok(None)
                }
                ']' if allow_end => {
                    self.close_container(/* object: */ false, events)?;
                    Ok(None)
                }
                '0'..='9' | '-' => {
                    self.scalar = Scalar::Num { buf: c.to_string() };
                    Ok(None)
                }
                't' | 'f' | 'n' => {
                    self.scalar = Scalar::Lit { buf: c.to_string() };
                    Ok(None)
                }
                _ => Err(stream_err(c, "value position")),
            },
            Expect::Key { allow_end } => match c {
                '"' => {
                    self.scalar = Scalar::Str {
                        buf: String::new(),
                        escape: false,
                        unicode: None,
                        pending_surrogate: None,
                        is_key: true,
                    };
                    Ok(None)
                }
                '}' if allow_end => {
                    self.close_container(true, events)?;
                    Ok(None)
                }
                _ => Err(stream_err(c, "object key position")),
            },
            Expect::Colon => {
                if c == ':' {
                    self.expect = Expect::Value { allow_end: false };
                    Ok(None)
                } else {
                    Err(stream_err(c, "after object key"))
                }
            }
            Expect::CommaOrEnd => match (c, self.stack.last()) {
                (',', Some(Frame::Object { .. })) => {
                    self.expect = Expect::Key { allow_end: false };
                    Ok(None)
                }
                (',', Some(Frame::Array { .. })) => {
                    self.expect = Expect::Value { allow_end: false };
                    Ok(None)
                }
                ('}', Some(Frame::Object { .. })) => {
                    self.close_container(true, events)?;
                    Ok(None)
                }
                (']', Some(Frame::Array { .. })) => {
                    self.close_container(false, events)?;
                    Ok(None)
                }
                _ => Err(stream_err(c, "after value")),
            },
            Expect::Done => Err(stream_err(c, "after document end")),
        }
    }

    /// Pop the top container and attach it to its parent.
    fn close_container(&mut self, object: bool, events: &mut Vec<JsonPath>) -> Result<()> {
        let value = match (object, self.stack.pop()) {
            (true, Some(Frame::Object { map, key: None })) => Value::Object(map),
            (false, Some(Frame::Array { items })) => Value::Array(items),
            _ => {
                return Err(MocksmithError::Stream(
                    "mismatched container delimiter in JSON stream".to_string(),
                ))
            }
        };
        self.attach(value, events);
        Ok(())
    }

    /// Attach a completed value to the innermost open container (or as the
    /// root) and record its resolution path.
    fn attach(&mut self, value: Value, events: &mut Vec<JsonPath>) {
        events.push(self.child_path());
        match self.stack.last_mut() {
            None => {
                self.root = Some(value);
                self.expect = Expect::Done;
            }
            Some(Frame::Object { map, key }) => {
                let key = key.take().expect("value attaches under a pending key");
                map.insert(key, value);
                self.expect = Expect::CommaOrEnd;
            }
            Some(Frame::Array { items }) => {
                items.push(value);
                self.expect = Expect::CommaOrEnd;
            }
        }
    }

    /// Path of the child slot currently being filled.
    fn child_path(&self) -> JsonPath {
        self.stack
            .iter()
            .map(|frame| match frame {
                Frame::Object { key, .. } => {
                    PathSeg::Key(key.clone().expect("open child has a pending key"))
                }
                Frame::Array { items } => PathSeg::Index(items.len()),
            })
            .collect()
    }
}

fn is_literal_prefix(s: &str) -> bool {
    ["true", "false", "null"].iter().any(|lit| lit.starts_with(s))
}

fn parse_number(text: &str) -> Result<Number> {
    if let Ok(i) = text.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = text.parse::<u64>() {
        return Ok(Number::from(u));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| MocksmithError::Stream(format!("invalid number '{text}' in JSON stream")))
}

fn stream_err(c: char, context: &str) -> MocksmithError {
    MocksmithError::Stream(format!("unexpected character '{c}' in {context}"))
}
