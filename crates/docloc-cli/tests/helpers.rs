use std::fs;
use std::path::Path;

/// Source-locale documents shared by the pipeline tests.
pub fn write_docs(root: &Path) {
    let src = root.join("src/en-US");
    fs::create_dir_all(src.join("guide")).unwrap();
    fs::write(
        src.join("index.md"),
        "# Welcome\n\nHello {name}\n\nRead the guide.\n",
    )
    .unwrap();
    fs::write(src.join("guide/usage.md"), "# Usage\n\nRead the guide.\n").unwrap();
}

pub fn add_locale(root: &Path, code: &str) {
    fs::create_dir_all(root.join("translations").join(code)).unwrap();
}

/// Fill `msgstr ""` for single-line msgids in a locale catalog.
pub fn translate(root: &Path, code: &str, pairs: &[(&str, &str)]) {
    let path = root.join("translations").join(code).join("messages.po");
    let mut text = fs::read_to_string(&path).unwrap();
    for (id, tr) in pairs {
        let from = format!("msgid \"{id}\"\nmsgstr \"\"\n");
        let to = format!("msgid \"{id}\"\nmsgstr \"{tr}\"\n");
        assert!(text.contains(&from), "msgid {id:?} not found in {}", path.display());
        text = text.replace(&from, &to);
    }
    fs::write(&path, text).unwrap();
}

pub const FRENCH: &[(&str, &str)] = &[
    ("# Welcome", "# Bienvenue"),
    ("Hello {name}", "Bonjour {name}"),
    ("Read the guide.", "Lisez le guide."),
    ("# Usage", "# Utilisation"),
];
