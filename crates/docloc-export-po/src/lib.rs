use docloc_core::{Catalog, DocLocError, Entry, Location, Result, Translation};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// How a catalog is laid out on disk.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Order entries by their sorted locations instead of catalog order.
    pub sort_by_file: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { sort_by_file: true }
    }
}

pub fn escape_po(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0B}' => out.push_str("\\v"),
            '\u{0C}' => out.push_str("\\f"),
            _ => out.push(ch),
        }
    }
    out
}

/// `keyword "value"`, or `keyword ""` followed by one quoted line per source
/// line when the value spans several lines.
fn write_string<W: Write>(w: &mut W, keyword: &str, value: &str) -> std::io::Result<()> {
    let segments: Vec<&str> = value.split_inclusive('\n').collect();
    if segments.len() <= 1 {
        return writeln!(w, "{keyword} \"{}\"", escape_po(value));
    }
    writeln!(w, "{keyword} \"\"")?;
    for seg in segments {
        writeln!(w, "\"{}\"", escape_po(seg))?;
    }
    Ok(())
}

fn write_comment_block<W: Write>(w: &mut W, comment: &str) -> std::io::Result<()> {
    for line in comment.lines() {
        if line.starts_with('#') {
            writeln!(w, "{line}")?;
        } else if line.is_empty() {
            writeln!(w, "#")?;
        } else {
            writeln!(w, "# {line}")?;
        }
    }
    Ok(())
}

fn write_header<W: Write>(w: &mut W, catalog: &Catalog) -> std::io::Result<()> {
    write_comment_block(w, &catalog.header_comment)?;
    if catalog.fuzzy_header {
        writeln!(w, "#, fuzzy")?;
    }
    writeln!(w, "msgid \"\"")?;
    writeln!(w, "msgstr \"\"")?;
    for (key, value) in &catalog.metadata {
        writeln!(w, "\"{}\"", escape_po(&format!("{key}: {value}\n")))?;
    }
    writeln!(w)
}

/// `file:line`, with the file name wrapped in U+2068/U+2069 isolation marks
/// when it contains whitespace so readers can still split the `#:` line.
fn format_reference(loc: &Location) -> String {
    if loc.file.chars().any(char::is_whitespace) {
        let file = format!("\u{2068}{}\u{2069}", loc.file);
        Location::new(file, loc.line).to_string()
    } else {
        loc.to_string()
    }
}

fn write_entry<W: Write>(w: &mut W, entry: &Entry) -> std::io::Result<()> {
    for c in &entry.user_comments {
        if c.is_empty() {
            writeln!(w, "#")?;
        } else {
            writeln!(w, "# {c}")?;
        }
    }
    for c in &entry.auto_comments {
        writeln!(w, "#. {c}")?;
    }
    let locs = entry.sorted_locations();
    if !locs.is_empty() {
        let refs: Vec<String> = locs.iter().map(format_reference).collect();
        writeln!(w, "#: {}", refs.join(" "))?;
    }
    let mut flags: Vec<&str> = Vec::new();
    if entry.fuzzy {
        flags.push("fuzzy");
    }
    flags.extend(entry.flags.iter().map(String::as_str));
    if !flags.is_empty() {
        writeln!(w, "#, {}", flags.join(", "))?;
    }

    if let Some(ctx) = &entry.id.context {
        write_string(w, "msgctxt", ctx)?;
    }
    write_string(w, "msgid", &entry.id.id)?;
    match (&entry.id_plural, &entry.translation) {
        (Some(plural), Translation::Plural(forms)) => {
            write_string(w, "msgid_plural", plural)?;
            for (i, form) in forms.iter().enumerate() {
                write_string(w, &format!("msgstr[{i}]"), form)?;
            }
        }
        (Some(plural), Translation::Singular(s)) => {
            write_string(w, "msgid_plural", plural)?;
            write_string(w, "msgstr[0]", s)?;
        }
        (None, translation) => {
            write_string(w, "msgstr", translation.first())?;
        }
    }
    writeln!(w)
}

/// Serialize `catalog` as PO text. Entries in `Catalog::obsolete` are not written.
pub fn write_po<W: Write>(mut w: W, catalog: &Catalog, opts: &WriteOptions) -> std::io::Result<()> {
    write_header(&mut w, catalog)?;

    let entries: Vec<&Entry> = if opts.sort_by_file {
        catalog.sorted_by_location()
    } else {
        catalog.iter().collect()
    };
    for entry in entries {
        write_entry(&mut w, entry)?;
    }
    w.flush()
}

/// Write `catalog` to `path`, replacing the file in full.
pub fn write_po_file(path: &Path, catalog: &Catalog, opts: &WriteOptions) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DocLocError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| DocLocError::io(path, e))?;
    write_po(BufWriter::new(file), catalog, opts).map_err(|e| DocLocError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docloc_core::{Location, MessageId, DEFAULT_DOMAIN};
    use std::fs;
    use tempfile::NamedTempFile;

    fn render(catalog: &Catalog, opts: &WriteOptions) -> String {
        let mut buf = Vec::new();
        write_po(&mut buf, catalog, opts).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn template() -> Catalog {
        let mut cat = Catalog::new(None, DEFAULT_DOMAIN);
        cat.header_comment = "# Translations template for Docs.\n#".into();
        cat.fuzzy_header = true;
        cat.set_header("Project-Id-Version", "Docs 1.0");
        cat.set_header("Content-Type", "text/plain; charset=utf-8");
        cat.add(MessageId::new("Second\nparagraph"), Location::new("en-US/b.md", 1));
        cat.add(MessageId::new("Say \"hi\""), Location::new("en-US/a.md", 3));
        cat.add(MessageId::new("Say \"hi\""), Location::new("en-US/a.md", 1));
        cat
    }

    #[test]
    fn header_carries_comment_fuzzy_flag_and_metadata() {
        let s = render(&template(), &WriteOptions::default());
        assert!(s.starts_with("# Translations template for Docs.\n#\n#, fuzzy\nmsgid \"\"\nmsgstr \"\"\n"));
        assert!(s.contains("\"Project-Id-Version: Docs 1.0\\n\"\n"));
        assert!(s.contains("\"Content-Type: text/plain; charset=utf-8\\n\"\n"));
    }

    #[test]
    fn entries_sorted_by_file_with_sorted_references() {
        let s = render(&template(), &WriteOptions::default());
        let a = s.find("#: en-US/a.md:1 en-US/a.md:3").expect("sorted references");
        let b = s.find("#: en-US/b.md:1").expect("b reference");
        assert!(a < b, "a.md entry must precede b.md entry");
        assert!(s.contains("msgid \"Say \\\"hi\\\"\"\nmsgstr \"\"\n"));
    }

    #[test]
    fn multiline_strings_are_split_per_line() {
        let s = render(&template(), &WriteOptions::default());
        assert!(s.contains("msgid \"\"\n\"Second\\n\"\n\"paragraph\"\nmsgstr \"\"\n"));
    }

    #[test]
    fn fuzzy_and_plural_entries() {
        let mut cat = Catalog::new(Some("fr".into()), DEFAULT_DOMAIN);
        let mut e = Entry::new(MessageId::with_context("file", "noun"));
        e.id_plural = Some("files".into());
        e.translation = Translation::Plural(vec!["fichier".into(), "fichiers".into()]);
        e.fuzzy = true;
        e.flags.insert("python-format".into());
        e.locations.push(Location::new("en-US/a.md", 7));
        e.auto_comments.push("extracted".into());
        cat.insert(e);

        let s = render(&cat, &WriteOptions::default());
        assert!(s.contains(
            "#. extracted\n#: en-US/a.md:7\n#, fuzzy, python-format\nmsgctxt \"noun\"\nmsgid \"file\"\nmsgid_plural \"files\"\nmsgstr[0] \"fichier\"\nmsgstr[1] \"fichiers\"\n"
        ));
    }

    #[test]
    fn obsolete_entries_are_dropped() {
        let mut cat = Catalog::new(Some("fr".into()), DEFAULT_DOMAIN);
        let mut old = Entry::new(MessageId::new("Gone"));
        old.translation = Translation::Singular("Parti".into());
        cat.obsolete.push(old);

        let s = render(&cat, &WriteOptions::default());
        assert!(!s.contains("Gone"));
        assert!(!s.contains("#~"));
    }

    #[test]
    fn file_names_with_spaces_are_isolated() {
        let mut cat = Catalog::new(None, DEFAULT_DOMAIN);
        cat.add(MessageId::new("Hello"), Location::new("en-US/my doc.md", 1));
        cat.add(MessageId::new("Hello"), Location::new("en-US/plain.md", 4));
        let s = render(&cat, &WriteOptions::default());
        assert!(s.contains("#: \u{2068}en-US/my doc.md\u{2069}:1 en-US/plain.md:4\n"));
    }

    #[test]
    fn control_characters_use_c_escapes() {
        assert_eq!(escape_po("a\tb\u{07}\u{08}\u{0B}\u{0C}\r"), "a\\tb\\a\\b\\v\\f\\r");
    }

    #[test]
    fn writes_file_to_disk() {
        let tmp = NamedTempFile::new().unwrap();
        write_po_file(tmp.path(), &template(), &WriteOptions::default()).unwrap();
        let s = fs::read_to_string(tmp.path()).unwrap();
        assert!(s.contains("#: en-US/b.md:1"));
    }
}
