// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

static UNITS: [(u64, &str); 3] = [(1 << 30, "Gi"), (1 << 20, "Mi"), (1 << 10, "Ki")];

/// Render a duration in s as hours and minutes, e.g., `01:05`.
pub fn duration_to_string(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds - hours * 3600) / 60;
    format!("{hours:02}:{mins:02}")
}

/// Render a size in bytes with binary units, e.g., `1.50 GiB`.
pub fn bytes_to_string(bytes: u64) -> String {
    for (size, unit) in UNITS {
        if bytes >= size {
            return format!("{:.2} {unit}B", bytes as f64 / size as f64);
        }
    }
    format!("{bytes} B")
}

/// Name of a file without directory and extension.
pub fn title(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|x| x.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Path of the log file associated with a given file.
pub fn logfile(path: &std::path::Path) -> std::path::PathBuf {
    path.with_extension("log")
}

/// Create a file for writing, truncating it if it exists and creating
/// the parent directories if needed.
pub fn create_output_file(path: &std::path::Path) -> std::io::Result<std::fs::File> {
    if let Some(parent_path) = path.parent() {
        if !parent_path.as_os_str().is_empty() && !parent_path.exists() {
            std::fs::create_dir_all(parent_path)?;
        }
    }
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_to_string() {
        assert_eq!("00:00", duration_to_string(0));
        assert_eq!("00:01", duration_to_string(119));
        assert_eq!("01:05", duration_to_string(3600 + 5 * 60 + 59));
        assert_eq!("123:00", duration_to_string(123 * 3600));
    }

    #[test]
    fn test_bytes_to_string() {
        assert_eq!("0 B", bytes_to_string(0));
        assert_eq!("1023 B", bytes_to_string(1023));
        assert_eq!("1.00 KiB", bytes_to_string(1024));
        assert_eq!("1.50 MiB", bytes_to_string(3 << 19));
        assert_eq!("2.25 GiB", bytes_to_string(9 << 28));
    }

    #[test]
    fn test_title_logfile() {
        let path = std::path::Path::new("/videos/source.mkv");
        assert_eq!("source", title(path));
        assert_eq!(std::path::PathBuf::from("/videos/source.log"), logfile(path));
        assert_eq!("", title(std::path::Path::new("/")));
    }

    #[test]
    fn test_create_output_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("a").join("b").join("file");
        create_output_file(&path)?;
        assert!(path.exists());
        std::fs::write(&path, "content")?;
        create_output_file(&path)?;
        assert_eq!("", std::fs::read_to_string(&path)?);
        Ok(())
    }
}
