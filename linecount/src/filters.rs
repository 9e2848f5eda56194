//! File filtering for the line counter.
//!
//! The allow-list is matched against the *file name* as a plain suffix, so
//! the check is case-sensitive and looks at the whole name rather than the
//! last `Path::extension` component. `bundle.min.js` matches `js`, and so
//! does a dotfile named `.js`. `README.GO` does not match `go`.
//!
//! An empty allow-list accepts every file.

/// Extensions counted when no other list is supplied.
pub const DEFAULT_EXTENSIONS: &[&str] = &["go", "html", "css", "js"];

/// Returns the built-in allow-list as owned strings
pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

/// Checks if a file name ends in `.<ext>` for one of the allowed extensions
pub fn has_valid_extension(file_name: &str, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }

    extensions.iter().any(|ext| {
        file_name
            .strip_suffix(ext.as_str())
            .is_some_and(|stem| stem.ends_with('.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_valid_extension() {
        let extensions = default_extensions();
        assert!(has_valid_extension("main.go", &extensions));
        assert!(has_valid_extension("index.html", &extensions));
        assert!(has_valid_extension("site.css", &extensions));
        assert!(has_valid_extension("app.js", &extensions));

        assert!(!has_valid_extension("notes.txt", &extensions));
        assert!(!has_valid_extension("main.rs", &extensions)); // Not in the list
        assert!(!has_valid_extension("Makefile", &extensions)); // No extension
        assert!(!has_valid_extension("go", &extensions)); // Bare name, no dot
        assert!(!has_valid_extension("algo", &extensions)); // Suffix without dot
    }

    #[test]
    fn test_case_sensitivity() {
        let extensions = default_extensions();
        assert!(!has_valid_extension("MAIN.GO", &extensions));
        assert!(!has_valid_extension("App.Js", &extensions));
    }

    #[test]
    fn test_suffix_semantics() {
        let extensions = default_extensions();
        assert!(has_valid_extension("bundle.min.js", &extensions));
        assert!(has_valid_extension(".js", &extensions));
        assert!(!has_valid_extension("app.json", &extensions));
        assert!(!has_valid_extension("style.scss.map", &extensions));
    }

    #[test]
    fn test_empty_allow_list_accepts_everything() {
        let extensions: Vec<String> = Vec::new();
        assert!(has_valid_extension("notes.txt", &extensions));
        assert!(has_valid_extension("Makefile", &extensions));
        assert!(has_valid_extension("", &extensions));
    }
}
