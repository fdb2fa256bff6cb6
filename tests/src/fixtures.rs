use std::path::Path;

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn write_file(root: &Path, relative_path: &str, contents: &[u8]) -> TestResult {
    let path = root.join(relative_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
