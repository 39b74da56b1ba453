use crate::error::ProsodyError;

/// One logical line of a long-form TextGrid. Multi-line string values are
/// folded into the entry that opened them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Line {
    /// 1-based line number where the entry starts.
    pub number: usize,
    pub entry: Entry,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Entry {
    /// `key = value`
    Assign { key: String, value: Value },
    /// `item []:`, `item [2]:`, `intervals [7]:`
    Block { name: String, index: Option<usize> },
    /// `intervals: size = 3`, `points: size = 0`
    Sized { name: String, size: String },
    /// `tiers? <exists>` or `tiers? <absent>`
    Exists { name: String, present: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    /// Quoted string with `""` escapes resolved.
    Text(String),
    /// Unquoted token, usually a number.
    Bare(String),
}

pub(crate) fn tokenize(text: &str) -> Result<Vec<Line>, ProsodyError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let raw_lines: Vec<&str> = text.lines().collect();
    let mut out = Vec::new();
    let mut idx = 0usize;

    while idx < raw_lines.len() {
        let number = idx + 1;
        let line = raw_lines[idx].trim();
        idx += 1;
        if line.is_empty() {
            continue;
        }

        if let Some((lhs, rhs)) = line.split_once('=') {
            let key = lhs.trim();
            let rhs = rhs.trim();
            if let Some(name) = key.strip_suffix("size").map(str::trim_end) {
                if let Some(name) = name.strip_suffix(':') {
                    out.push(Line {
                        number,
                        entry: Entry::Sized {
                            name: name.trim().to_string(),
                            size: rhs.to_string(),
                        },
                    });
                    continue;
                }
            }
            let value = match rhs.strip_prefix('"') {
                Some(rest) => Value::Text(read_quoted(rest, number, &raw_lines, &mut idx)?),
                None => Value::Bare(rhs.to_string()),
            };
            out.push(Line {
                number,
                entry: Entry::Assign {
                    key: key.to_string(),
                    value,
                },
            });
            continue;
        }

        if let Some(header) = line.strip_suffix(':') {
            out.push(Line {
                number,
                entry: parse_block_header(header.trim(), number)?,
            });
            continue;
        }

        let flag = line
            .strip_suffix("<exists>")
            .map(|name| (name, true))
            .or_else(|| line.strip_suffix("<absent>").map(|name| (name, false)));
        if let Some((name, present)) = flag {
            out.push(Line {
                number,
                entry: Entry::Exists {
                    name: name.trim().to_string(),
                    present,
                },
            });
            continue;
        }

        return Err(ProsodyError::syntax(
            number,
            format!("unrecognized line '{line}'"),
        ));
    }

    Ok(out)
}

fn parse_block_header(header: &str, number: usize) -> Result<Entry, ProsodyError> {
    let Some((name, rest)) = header.split_once('[') else {
        return Ok(Entry::Block {
            name: header.to_string(),
            index: None,
        });
    };
    let inner = rest
        .strip_suffix(']')
        .ok_or_else(|| ProsodyError::syntax(number, format!("unclosed '[' in '{header}:'")))?
        .trim();
    let index = if inner.is_empty() {
        None
    } else {
        Some(inner.parse::<usize>().map_err(|_| ProsodyError::InvalidNumber {
            line: number,
            value: inner.to_string(),
        })?)
    };
    Ok(Entry::Block {
        name: name.trim().to_string(),
        index,
    })
}

/// Reads a quoted value whose opening quote has already been consumed.
/// Continues onto following raw lines until the closing quote.
fn read_quoted(
    first: &str,
    number: usize,
    raw_lines: &[&str],
    idx: &mut usize,
) -> Result<String, ProsodyError> {
    let mut value = String::new();
    let mut current = first;
    loop {
        let mut chars = current.char_indices().peekable();
        while let Some((pos, c)) = chars.next() {
            if c != '"' {
                value.push(c);
                continue;
            }
            if matches!(chars.peek(), Some((_, '"'))) {
                chars.next();
                value.push('"');
                continue;
            }
            let trailing = current[pos + 1..].trim();
            if !trailing.is_empty() {
                return Err(ProsodyError::syntax(
                    *idx,
                    format!("unexpected '{trailing}' after closing quote"),
                ));
            }
            return Ok(value);
        }

        let Some(next) = raw_lines.get(*idx) else {
            return Err(ProsodyError::syntax(number, "unterminated string value"));
        };
        value.push('\n');
        current = next;
        *idx += 1;
    }
}
