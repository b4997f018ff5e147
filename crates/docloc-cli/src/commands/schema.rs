use std::fs;

pub fn run_schema(out_dir: std::path::PathBuf) -> color_eyre::Result<bool> {
    fs::create_dir_all(&out_dir)?;
    macro_rules! dump {
        ($ty:ty, $name:literal) => {{
            let schema = schemars::schema_for!($ty);
            let path = out_dir.join($name);
            let f = std::fs::File::create(&path)?;
            serde_json::to_writer_pretty(f, &schema)?;
        }};
    }
    dump!(docloc_domain::ExtractSummary, "extract_summary.schema.json");
    dump!(docloc_domain::LocaleUpdate, "locale_update.schema.json");
    dump!(docloc_domain::LocaleCompletion, "locale_completion.schema.json");
    dump!(docloc_domain::LocaleCheck, "locale_check.schema.json");
    crate::ui_ok!("schemas written to {}", out_dir.display());
    Ok(true)
}
