use std::path::{Path, PathBuf};

/// Single-page entry document, served for anything that isn't a real file
pub const INDEX_FILE: &str = "index.html";

/// What to do with a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Hidden version-control path: 403
    Forbidden,
    /// An existing file inside the root
    File {
        path: PathBuf,
        content_type: &'static str,
    },
    /// Fall back to the entry document
    Index(PathBuf),
    /// Nothing to serve at all: 404
    NotFound,
}

/// A directory of static assets
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    /// Serve files under `root`. Fails if the directory doesn't exist.
    pub fn new<P: AsRef<Path>>(root: P) -> std::io::Result<Self> {
        let root = root.as_ref().canonicalize()?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decide what a raw (still percent-encoded) request path maps to
    pub fn resolve(&self, request_path: &str) -> Resolution {
        if is_hidden_git_path(request_path) {
            return Resolution::Forbidden;
        }
        // Any other spelling of .git is caught once decoded
        if let Ok(decoded) = urlencoding::decode(request_path) {
            if has_git_segment(&decoded) {
                return Resolution::Forbidden;
            }
        }

        if let Some(path) = self.existing_file(request_path) {
            let content_type = content_type_for(&path);
            return Resolution::File { path, content_type };
        }

        let index = self.root.join(INDEX_FILE);
        if index.is_file() {
            Resolution::Index(index)
        } else {
            Resolution::NotFound
        }
    }

    /// Canonical path of a regular file under the root, if the request names one
    fn existing_file(&self, request_path: &str) -> Option<PathBuf> {
        let decoded = urlencoding::decode(request_path).ok()?;
        let relative = decoded.trim_start_matches('/');
        if relative.is_empty() {
            return None;
        }

        let candidate = self.root.join(relative).canonicalize().ok()?;
        // Anything that climbs out with ../ or a symlink stays out
        if !candidate.starts_with(&self.root) || !candidate.is_file() {
            return None;
        }
        Some(candidate)
    }
}

/// True for paths with a `/.git` segment, plain or percent-encoded, any case
pub fn is_hidden_git_path(request_path: &str) -> bool {
    let lower = request_path.to_ascii_lowercase();
    lower.contains("/.git") || lower.contains("/%2egit")
}

/// True if any decoded path segment starts with `.git`, any case
pub fn has_git_segment(decoded_path: &str) -> bool {
    decoded_path
        .split(['/', '\\'])
        .any(|segment| segment.to_ascii_lowercase().starts_with(".git"))
}

/// Content type from the file extension
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site(with_index: bool) -> (TempDir, StaticFiles) {
        let dir = TempDir::new().unwrap();
        if with_index {
            std::fs::write(dir.path().join(INDEX_FILE), "<h1>hi</h1>").unwrap();
        }
        std::fs::write(dir.path().join("main.js"), "console.log(1)").unwrap();
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets").join("My Logo.PNG"), [0u8; 4]).unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join(".git").join("config"), "[core]").unwrap();
        let files = StaticFiles::new(dir.path()).unwrap();
        (dir, files)
    }

    #[test]
    fn test_git_paths_are_forbidden() {
        let (_dir, files) = site(true);
        for path in ["/.git/config", "/.GIT/HEAD", "/%2Egit/HEAD", "/sub/.Git", "/.gitignore"] {
            assert_eq!(files.resolve(path), Resolution::Forbidden, "{path}");
        }
        assert!(!is_hidden_git_path("/digit/main.js"));
        assert!(!is_hidden_git_path("/git/readme.txt"));
    }

    #[test]
    fn test_encoded_git_spellings_are_forbidden() {
        let (_dir, files) = site(true);
        for path in ["/%2e%67it/config", "/.%67it/config", "/%2E%47%49%54/config", "/a/..%2f.git/config"] {
            assert_eq!(files.resolve(path), Resolution::Forbidden, "{path}");
        }
        assert!(has_git_segment("/sub/.GIT"));
        assert!(has_git_segment("\\.git\\HEAD"));
        assert!(!has_git_segment("/digit/x.git/git/main.js"));
    }

    #[test]
    fn test_existing_file_with_content_type() {
        let (_dir, files) = site(true);
        match files.resolve("/main.js") {
            Resolution::File { path, content_type } => {
                assert!(path.ends_with("main.js"));
                assert_eq!(content_type, "application/javascript; charset=utf-8");
            }
            other => panic!("expected file, got {other:?}"),
        }

        match files.resolve("/assets/My%20Logo.PNG") {
            Resolution::File { content_type, .. } => assert_eq!(content_type, "image/png"),
            other => panic!("expected file, got {other:?}"),
        }
    }

    #[test]
    fn test_spa_fallback() {
        let (_dir, files) = site(true);
        let index = files.root().join(INDEX_FILE);
        assert_eq!(files.resolve("/"), Resolution::Index(index.clone()));
        assert_eq!(files.resolve("/some/route"), Resolution::Index(index.clone()));
        assert_eq!(files.resolve("/assets"), Resolution::Index(index.clone()));
        assert_eq!(files.resolve("/../../etc/passwd"), Resolution::Index(index));
    }

    #[test]
    fn test_not_found_without_index() {
        let (_dir, files) = site(false);
        assert_eq!(files.resolve("/missing.css"), Resolution::NotFound);
        assert!(matches!(files.resolve("/main.js"), Resolution::File { .. }));
    }

    #[test]
    fn test_content_type_table() {
        let cases = [
            ("a.html", "text/html; charset=utf-8"),
            ("a.css", "text/css; charset=utf-8"),
            ("a.json", "application/json; charset=utf-8"),
            ("a.jpg", "image/jpeg"),
            ("a.JPEG", "image/jpeg"),
            ("a.svg", "image/svg+xml"),
            ("favicon.ico", "image/x-icon"),
            ("notes.txt", "text/plain; charset=utf-8"),
            ("blob.wasm", "application/octet-stream"),
            ("Makefile", "application/octet-stream"),
        ];
        for (name, expected) in cases {
            assert_eq!(content_type_for(Path::new(name)), expected, "{name}");
        }
    }
}
