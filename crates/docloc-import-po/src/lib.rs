use docloc_core::{Catalog, DocLocError, Entry, Location, MessageId, Result, Translation, DEFAULT_DOMAIN};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Read a PO/POT file into a catalog. `locale` overrides the `Language` header.
pub fn read_po(path: &Path, locale: Option<&str>) -> Result<Catalog> {
    let text = std::fs::read_to_string(path).map_err(|e| DocLocError::io(path, e))?;
    parse_po(&text, path, locale)
}

/// Parse PO text. `origin` only names the source in error reports.
pub fn parse_po(text: &str, origin: &Path, locale: Option<&str>) -> Result<Catalog> {
    let mut parser = Parser {
        path: origin,
        catalog: Catalog::new(locale.map(str::to_string), DEFAULT_DOMAIN),
        pending: Pending::default(),
        field: Field::None,
    };
    for (idx, line) in text.lines().enumerate() {
        parser.feed(idx + 1, line)?;
    }
    parser.flush()?;

    let mut catalog = parser.catalog;
    if catalog.locale.is_none() {
        catalog.locale = catalog
            .header("Language")
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);
    }
    Ok(catalog)
}

fn malformed(path: &Path, line: usize, message: impl Into<String>) -> DocLocError {
    DocLocError::MalformedCatalog {
        path: path.to_path_buf(),
        line,
        message: message.into(),
    }
}

fn parse_po_string(s: &str) -> std::result::Result<String, String> {
    let s = s.trim();
    if s.len() < 2 || !s.starts_with('"') || !s.ends_with('"') {
        return Err(format!("invalid po string: {s}"));
    }
    let inner = &s[1..s.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('a') => out.push('\u{07}'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0C}'),
            Some('v') => out.push('\u{0B}'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(d @ '0'..='7') => {
                let mut code = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(v) => {
                            code = code * 8 + v;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code).ok_or_else(|| format!("bad octal escape in po string: {s}"))?);
            }
            Some('x') => {
                let mut code = 0u32;
                let mut digits = 0;
                while let Some(v) = chars.peek().and_then(|c| c.to_digit(16)) {
                    code = code * 16 + v;
                    digits += 1;
                    chars.next();
                    if digits == 2 {
                        break;
                    }
                }
                if digits == 0 {
                    return Err(format!("bad hex escape in po string: {s}"));
                }
                out.push(char::from_u32(code).ok_or_else(|| format!("bad hex escape in po string: {s}"))?);
            }
            Some(other) => out.push(other),
            None => return Err(format!("dangling escape in po string: {s}")),
        }
    }
    Ok(out)
}

/// Split a `#:` line into references. File names containing whitespace are
/// wrapped in U+2068 FIRST STRONG ISOLATE / U+2069 POP DIRECTIONAL ISOLATE,
/// as GNU gettext writes them.
fn split_references(refs: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = None;
    let mut isolated = false;
    for (i, ch) in refs.char_indices() {
        match ch {
            '\u{2068}' => {
                isolated = true;
                start.get_or_insert(i);
            }
            '\u{2069}' => isolated = false,
            c if c.is_whitespace() && !isolated => {
                if let Some(st) = start.take() {
                    out.push(&refs[st..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(st) = start {
        out.push(&refs[st..]);
    }
    out
}

fn parse_reference(token: &str) -> Location {
    let unisolate = |f: &str| f.replace(['\u{2068}', '\u{2069}'], "");
    match token.rsplit_once(':') {
        Some((file, line)) if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) => {
            Location::new(unisolate(file), line.parse().unwrap_or(0))
        }
        _ => Location::new(unisolate(token), 0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Ctxt,
    Id,
    IdPlural,
    Str,
    StrPlural(usize),
}

#[derive(Debug, Default)]
struct Pending {
    user_comments: Vec<String>,
    auto_comments: Vec<String>,
    locations: Vec<Location>,
    flags: BTreeSet<String>,
    fuzzy: bool,
    msgctxt: Option<String>,
    msgid: Option<String>,
    msgid_line: usize,
    msgid_plural: Option<String>,
    msgstr: Option<String>,
    msgstr_plural: BTreeMap<usize, String>,
    obsolete: bool,
}

impl Pending {
    fn has_msgstr(&self) -> bool {
        self.msgstr.is_some() || !self.msgstr_plural.is_empty()
    }
}

struct Parser<'a> {
    path: &'a Path,
    catalog: Catalog,
    pending: Pending,
    field: Field,
}

impl Parser<'_> {
    fn feed(&mut self, lineno: usize, raw: &str) -> std::result::Result<(), DocLocError> {
        let t = raw.trim();
        if t.is_empty() {
            return self.flush();
        }
        if let Some(rest) = t.strip_prefix("#~") {
            let rest = rest.trim_start();
            // previous-msgid lines of obsolete entries
            if rest.starts_with('|') || rest.is_empty() {
                return Ok(());
            }
            return self.keyword(lineno, rest, true);
        }
        if t.starts_with('#') {
            if self.pending.has_msgstr() {
                self.flush()?;
            }
            self.comment(t);
            return Ok(());
        }
        self.keyword(lineno, t, false)
    }

    fn comment(&mut self, t: &str) {
        if let Some(refs) = t.strip_prefix("#:") {
            self.pending
                .locations
                .extend(split_references(refs).into_iter().map(parse_reference));
        } else if let Some(flags) = t.strip_prefix("#,") {
            for flag in flags.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                if flag == "fuzzy" {
                    self.pending.fuzzy = true;
                } else {
                    self.pending.flags.insert(flag.to_string());
                }
            }
        } else if let Some(c) = t.strip_prefix("#.") {
            self.pending.auto_comments.push(c.trim().to_string());
        } else if t.starts_with("#|") {
            // previous msgid, not kept
        } else {
            self.pending.user_comments.push(t[1..].trim().to_string());
        }
    }

    fn keyword(&mut self, lineno: usize, t: &str, obsolete: bool) -> std::result::Result<(), DocLocError> {
        let path = self.path;

        if t.starts_with('"') {
            let s = parse_po_string(t).map_err(|m| malformed(path, lineno, m))?;
            let target = match self.field {
                Field::Ctxt => self.pending.msgctxt.get_or_insert_with(String::new),
                Field::Id => self.pending.msgid.get_or_insert_with(String::new),
                Field::IdPlural => self.pending.msgid_plural.get_or_insert_with(String::new),
                Field::Str => self.pending.msgstr.get_or_insert_with(String::new),
                Field::StrPlural(i) => self.pending.msgstr_plural.entry(i).or_default(),
                Field::None => {
                    return Err(malformed(path, lineno, "string continuation outside of a field"))
                }
            };
            target.push_str(&s);
            return Ok(());
        }

        let Some((keyword, rest)) = t.split_once(char::is_whitespace) else {
            return Err(malformed(path, lineno, format!("unexpected line: {t}")));
        };
        let value = parse_po_string(rest).map_err(|m| malformed(path, lineno, m))?;

        if matches!(keyword, "msgctxt" | "msgid") && self.pending.has_msgstr() {
            self.flush()?;
        }
        if obsolete {
            self.pending.obsolete = true;
        }

        match keyword {
            "msgctxt" => {
                if self.pending.msgid.is_some() {
                    return Err(malformed(path, lineno, "msgctxt after msgid"));
                }
                self.pending.msgctxt = Some(value);
                self.field = Field::Ctxt;
            }
            "msgid" => {
                if self.pending.msgid.is_some() {
                    return Err(malformed(path, lineno, "msgid without msgstr"));
                }
                self.pending.msgid = Some(value);
                self.pending.msgid_line = lineno;
                self.field = Field::Id;
            }
            "msgid_plural" => {
                if self.pending.msgid.is_none() {
                    return Err(malformed(path, lineno, "msgid_plural before msgid"));
                }
                self.pending.msgid_plural = Some(value);
                self.field = Field::IdPlural;
            }
            "msgstr" => {
                if self.pending.msgid.is_none() {
                    return Err(malformed(path, lineno, "msgstr before msgid"));
                }
                self.pending.msgstr = Some(value);
                self.field = Field::Str;
            }
            k if k.starts_with("msgstr[") && k.ends_with(']') => {
                if self.pending.msgid.is_none() {
                    return Err(malformed(path, lineno, "msgstr before msgid"));
                }
                let idx: usize = k["msgstr[".len()..k.len() - 1]
                    .parse()
                    .map_err(|_| malformed(path, lineno, format!("bad plural index: {k}")))?;
                self.pending.msgstr_plural.insert(idx, value);
                self.field = Field::StrPlural(idx);
            }
            other => {
                return Err(malformed(path, lineno, format!("unknown keyword: {other}")));
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> std::result::Result<(), DocLocError> {
        let p = std::mem::take(&mut self.pending);
        self.field = Field::None;
        let has_msgstr = p.has_msgstr();

        // comment-only trailer
        let Some(msgid) = p.msgid else {
            return Ok(());
        };
        if !has_msgstr {
            return Err(malformed(self.path, p.msgid_line, "msgid without msgstr"));
        }

        if msgid.is_empty() && p.msgctxt.is_none() && !p.obsolete {
            self.catalog.header_comment = p
                .user_comments
                .iter()
                .map(|c| if c.is_empty() { "#".to_string() } else { format!("# {c}") })
                .collect::<Vec<_>>()
                .join("\n");
            self.catalog.fuzzy_header = p.fuzzy;
            for line in p.msgstr.unwrap_or_default().lines() {
                if let Some((k, v)) = line.split_once(':') {
                    self.catalog.set_header(k.trim(), v.trim());
                }
            }
            return Ok(());
        }

        let translation = if p.msgid_plural.is_some() || !p.msgstr_plural.is_empty() {
            match p.msgstr_plural.keys().next_back().copied() {
                Some(max) => Translation::Plural(
                    (0..=max)
                        .map(|i| p.msgstr_plural.get(&i).cloned().unwrap_or_default())
                        .collect(),
                ),
                None => Translation::Plural(vec![p.msgstr.unwrap_or_default()]),
            }
        } else {
            Translation::Singular(p.msgstr.unwrap_or_default())
        };

        let entry = Entry {
            id: MessageId {
                id: msgid,
                context: p.msgctxt,
            },
            id_plural: p.msgid_plural,
            translation,
            fuzzy: p.fuzzy,
            flags: p.flags,
            locations: p.locations,
            auto_comments: p.auto_comments,
            user_comments: p.user_comments,
            po_line: Some(p.msgid_line),
        };
        if p.obsolete {
            self.catalog.obsolete.push(entry);
        } else {
            self.catalog.insert(entry);
        }
        Ok(())
    }
}
