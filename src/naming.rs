// @module: Output file naming for translated documents

/// Name of the translated file: `{base}_{target_language}.{ext}`.
///
/// The base/extension split happens at the last dot, so `a.b.c.json`
/// keeps `a.b.c` as its base. A name without a dot gets the language
/// suffix appended and no extension.
pub fn output_name(source_name: &str, target_language: &str) -> String {
    match source_name.rsplit_once('.') {
        Some((base, extension)) => format!("{}_{}.{}", base, target_language, extension),
        None => format!("{}_{}", source_name, target_language),
    }
}
