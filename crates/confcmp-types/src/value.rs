//! Property value helpers.
//!
//! Configuration dumps frequently store compound values in their Python
//! `repr` form (`"['A/a', 'B/b']"`, `"'quoted'"`, `"True"`). The helpers here
//! turn such strings back into structured [`Value`]s and render values in
//! the same textual form so that dumped and typed values compare equal.

use serde_json::{Map, Number, Value};

/// Parse a Python-style literal.
///
/// Supports quoted strings (single or double quotes, with backslash
/// escapes), lists, tuples, dicts, integers, floats, `True`, `False` and
/// `None`. Returns `None` if the whole input is not a single literal.
pub fn parse_literal(input: &str) -> Option<Value> {
    let mut parser = LiteralParser {
        chars: input.chars().collect(),
        pos: 0,
    };
    parser.skip_ws();
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos == parser.chars.len() {
        Some(value)
    } else {
        None
    }
}

/// Unwrap a value that may hold a stringified literal.
///
/// Strings that parse as a literal are replaced by the parsed value; every
/// other value (and every string that is not a literal) is returned as is.
pub fn literal_or_self(value: &Value) -> Value {
    match value {
        Value::String(s) => parse_literal(s).unwrap_or_else(|| value.clone()),
        other => other.clone(),
    }
}

/// Render a value the way configuration dumps print it.
///
/// Top-level strings are rendered bare; strings nested in lists or
/// mappings are single-quoted.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => repr(other),
    }
}

fn repr(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(repr).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", repr(&Value::String(k.clone())), repr(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

/// Apply `f` to every string reachable from `value`, rebuilding lists and
/// mappings around the results.
pub fn map_strings(value: &Value, f: &mut dyn FnMut(&str) -> Value) -> Value {
    match value {
        Value::String(s) => f(s),
        Value::Array(items) => Value::Array(items.iter().map(|v| map_strings(v, f)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), map_strings(v, f)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Rewrite strings reachable from `value`, including strings nested inside
/// stringified list or dict literals.
///
/// `f` returns `Some(replacement)` for strings it rewrites. A stringified
/// literal is re-rendered only when one of its strings was rewritten, so
/// untouched values keep their exact original text.
pub fn rewrite_strings(value: &Value, f: &mut dyn FnMut(&str) -> Option<String>) -> Value {
    match value {
        Value::String(s) => {
            if let Some(replacement) = f(s) {
                return Value::String(replacement);
            }
            match parse_literal(s) {
                Some(literal @ (Value::Array(_) | Value::Object(_))) => {
                    let mut changed = false;
                    let rewritten = map_strings(&literal, &mut |inner: &str| match f(inner) {
                        Some(replacement) => {
                            changed = true;
                            Value::String(replacement)
                        }
                        None => Value::String(inner.to_string()),
                    });
                    if changed {
                        Value::String(stringify(&rewritten))
                    } else {
                        value.clone()
                    }
                }
                _ => value.clone(),
            }
        }
        Value::Array(items) => Value::Array(items.iter().map(|v| rewrite_strings(v, f)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), rewrite_strings(v, f)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Split `"Type/Instance"` into its two non-empty parts.
pub fn split_typed_name(s: &str) -> Option<(&str, &str)> {
    let (class, instance) = s.split_once('/')?;
    if class.is_empty() || instance.is_empty() || instance.contains('/') {
        return None;
    }
    Some((class, instance))
}

struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralParser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn value(&mut self) -> Option<Value> {
        match self.peek()? {
            '\'' | '"' => self.string().map(Value::String),
            '[' => self.sequence('[', ']'),
            '(' => self.sequence('(', ')'),
            '{' => self.dict(),
            c if c == '-' || c == '+' || c.is_ascii_digit() || c == '.' => self.number(),
            c if c.is_alphabetic() => self.keyword(),
            _ => None,
        }
    }

    fn string(&mut self) -> Option<String> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                '\\' => match self.bump()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '0' => out.push('\0'),
                    other => out.push(other),
                },
                c if c == quote => return Some(out),
                c => out.push(c),
            }
        }
    }

    fn sequence(&mut self, open: char, close: char) -> Option<Value> {
        if !self.eat(open) {
            return None;
        }
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Some(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            self.skip_ws();
            return self.eat(close).then_some(Value::Array(items));
        }
    }

    fn dict(&mut self) -> Option<Value> {
        if !self.eat('{') {
            return None;
        }
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.eat('}') {
                return Some(Value::Object(map));
            }
            let key = stringify(&self.value()?);
            self.skip_ws();
            if !self.eat(':') {
                return None;
            }
            self.skip_ws();
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            self.skip_ws();
            return self.eat('}').then_some(Value::Object(map));
        }
    }

    fn number(&mut self) -> Option<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.'))
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if let Ok(i) = text.parse::<i64>() {
            return Some(Value::Number(i.into()));
        }
        let f = text.parse::<f64>().ok()?;
        Number::from_f64(f).map(Value::Number)
    }

    fn keyword(&mut self) -> Option<Value> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "True" => Some(Value::Bool(true)),
            "False" => Some(Value::Bool(false)),
            "None" => Some(Value::Null),
            _ => None,
        }
    }
}
