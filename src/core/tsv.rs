use crate::core::error::IngestError;
use memchr::memchr_iter;

/// A tab-separated table borrowed from the source bytes.
#[derive(Clone, Debug)]
pub struct TsvTable<'a> {
    pub header: Vec<&'a str>,
    pub rows: Vec<TsvRow<'a>>,
}

#[derive(Clone, Debug)]
pub struct TsvRow<'a> {
    /// 1-based line number in the source.
    pub line: usize,
    pub fields: Vec<&'a str>,
}

impl<'a> TsvTable<'a> {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| *h == name)
    }
}

impl<'a> TsvRow<'a> {
    /// Rows shorter than the header yield `None` for the trailing columns.
    pub fn get(&self, col: usize) -> Option<&'a str> {
        self.fields.get(col).copied()
    }
}

pub fn parse(bytes: &[u8]) -> Result<TsvTable<'_>, IngestError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        let line = memchr_iter(b'\n', &bytes[..e.valid_up_to()]).count() + 1;
        IngestError::Parse {
            line,
            reason: "invalid UTF-8".to_string(),
        }
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut header: Option<Vec<&str>> = None;
    let mut rows = Vec::new();
    for (idx, line) in lines(text).enumerate() {
        let line_no = idx + 1;
        if line.is_empty() {
            continue;
        }
        let fields = split_fields(line);
        match header.as_ref().map(Vec::len) {
            None => {
                if fields.iter().all(|f| f.is_empty()) {
                    return Err(IngestError::Parse {
                        line: line_no,
                        reason: "empty header row".to_string(),
                    });
                }
                header = Some(fields);
            }
            Some(expected) => {
                if fields.len() > expected {
                    return Err(IngestError::Parse {
                        line: line_no,
                        reason: format!("expected {} fields, saw {}", expected, fields.len()),
                    });
                }
                rows.push(TsvRow {
                    line: line_no,
                    fields,
                });
            }
        }
    }

    let Some(header) = header else {
        return Err(IngestError::Parse {
            line: 1,
            reason: "missing header row".to_string(),
        });
    };
    if rows.is_empty() {
        return Err(IngestError::Parse {
            line: 2,
            reason: "no data rows".to_string(),
        });
    }
    Ok(TsvTable { header, rows })
}

fn lines(text: &str) -> impl Iterator<Item = &str> {
    let bytes = text.as_bytes();
    let mut start = 0usize;
    let mut ends = memchr_iter(b'\n', bytes).chain(std::iter::once(bytes.len()));
    std::iter::from_fn(move || {
        if start > bytes.len() {
            return None;
        }
        let end = ends.next()?;
        let line = &text[start..end];
        start = end + 1;
        Some(line.strip_suffix('\r').unwrap_or(line))
    })
}

fn split_fields(line: &str) -> Vec<&str> {
    let mut out = Vec::with_capacity(16);
    let mut start = 0usize;
    for pos in memchr_iter(b'\t', line.as_bytes()) {
        out.push(&line[start..pos]);
        start = pos + 1;
    }
    out.push(&line[start..]);
    out
}
