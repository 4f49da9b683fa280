//! Language counting via a pruned recursive walk + extension table
//! (spec.md §4.4 "Language counting").
use super::types::LanguageInfo;
use std::collections::HashMap;
use std::path::Path;

/// Directories pruned during the walk, by base name (or `.`-prefix, handled
/// separately). Matches spec.md §4.4.
const SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "vendor",
    "__pycache__",
    ".idea",
    ".vscode",
    "target",
    "build",
    "dist",
    "bin",
    ".next",
    ".nuxt",
];

/// Extension → language name. ~50 entries per spec.md §4.4.
const EXTENSIONS: &[(&str, &str)] = &[
    ("go", "Go"),
    ("rs", "Rust"),
    ("py", "Python"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("java", "Java"),
    ("kt", "Kotlin"),
    ("kts", "Kotlin"),
    ("cs", "C#"),
    ("c", "C"),
    ("h", "C"),
    ("cpp", "C++"),
    ("cc", "C++"),
    ("cxx", "C++"),
    ("hpp", "C++"),
    ("js", "JavaScript"),
    ("mjs", "JavaScript"),
    ("cjs", "JavaScript"),
    ("jsx", "JavaScript"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("swift", "Swift"),
    ("m", "Objective-C"),
    ("mm", "Objective-C++"),
    ("scala", "Scala"),
    ("clj", "Clojure"),
    ("cljs", "Clojure"),
    ("ex", "Elixir"),
    ("exs", "Elixir"),
    ("erl", "Erlang"),
    ("hs", "Haskell"),
    ("lua", "Lua"),
    ("pl", "Perl"),
    ("pm", "Perl"),
    ("sh", "Shell"),
    ("bash", "Shell"),
    ("zsh", "Shell"),
    ("ps1", "PowerShell"),
    ("sql", "SQL"),
    ("html", "HTML"),
    ("htm", "HTML"),
    ("css", "CSS"),
    ("scss", "SCSS"),
    ("sass", "Sass"),
    ("less", "Less"),
    ("vue", "Vue"),
    ("svelte", "Svelte"),
    ("md", "Markdown"),
    ("mdx", "Markdown"),
    ("json", "JSON"),
    ("yaml", "YAML"),
    ("yml", "YAML"),
    ("toml", "TOML"),
    ("xml", "XML"),
    ("proto", "Protocol Buffers"),
    ("dart", "Dart"),
    ("r", "R"),
    ("jl", "Julia"),
    ("zig", "Zig"),
    ("nim", "Nim"),
    ("ml", "OCaml"),
    ("fs", "F#"),
    ("fsx", "F#"),
];

fn language_for_extension(ext: &str) -> Option<&'static str> {
    EXTENSIONS
        .iter()
        .find(|(e, _)| e.eq_ignore_ascii_case(ext))
        .map(|(_, lang)| *lang)
}

/// Counts files per language under `root`, pruning the default ignore set
/// and dotfiles/dotdirs. Returned list is sorted descending by file count,
/// ties broken by language name (stable per spec.md §4.4).
///
/// Note: per spec.md §9 open question, `*_test.go` and similar test files
/// are counted as ordinary source — not special-cased — matching existing
/// behavior in the system this crate is modeled on.
pub fn count_languages(root: &Path) -> Vec<LanguageInfo> {
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    let mut extensions: HashMap<&'static str, std::collections::BTreeSet<String>> =
        HashMap::new();
    walk(root, &mut counts, &mut extensions);

    let mut result: Vec<LanguageInfo> = counts
        .into_iter()
        .map(|(name, file_count)| LanguageInfo {
            name: name.to_string(),
            file_count,
            extensions: extensions
                .remove(name)
                .map(|set| set.into_iter().collect())
                .unwrap_or_default(),
        })
        .collect();

    result.sort_by(|a, b| b.file_count.cmp(&a.file_count).then_with(|| a.name.cmp(&b.name)));
    result
}

fn walk(
    dir: &Path,
    counts: &mut HashMap<&'static str, usize>,
    extensions: &mut HashMap<&'static str, std::collections::BTreeSet<String>>,
) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let name = entry.file_name();
        let name_str = name.to_string_lossy();
        if name_str.starts_with('.') || SKIP_DIRS.contains(&name_str.as_ref()) {
            continue;
        }
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            walk(&path, counts, extensions);
        } else if file_type.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if let Some(lang) = language_for_extension(ext) {
                    *counts.entry(lang).or_insert(0) += 1;
                    extensions
                        .entry(lang)
                        .or_default()
                        .insert(ext.to_ascii_lowercase());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn counts_and_sorts_descending() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["main.go", "lib.go", "handler.go", "index.js", "README.md", "config.yaml"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let langs = count_languages(dir.path());
        assert_eq!(langs[0].name, "Go");
        assert_eq!(langs[0].file_count, 3);
        assert!(langs.iter().any(|l| l.name == "JavaScript" && l.file_count == 1));
        assert!(langs.iter().any(|l| l.name == "Markdown" && l.file_count == 1));
        assert!(langs.iter().any(|l| l.name == "YAML" && l.file_count == 1));
    }

    #[test]
    fn skips_ignored_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/vendored.js"), "").unwrap();
        fs::write(dir.path().join("app.js"), "").unwrap();
        let langs = count_languages(dir.path());
        let js = langs.iter().find(|l| l.name == "JavaScript").unwrap();
        assert_eq!(js.file_count, 1);
    }
}
