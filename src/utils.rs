//! Utility functions and helpers.

use std::path::Path;

/// Gets the file extension from a path.
pub fn get_file_extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Formats file size in human-readable format.
pub fn format_file_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: u64 = 1024;

    if size == 0 {
        return "0 B".to_string();
    }

    let mut size = size as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD as f64 && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD as f64;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size as u64, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Percentage of `total` covered by `done`, for progress logging.
pub fn percent_of(done: u64, total: u64) -> u64 {
    if total == 0 {
        100
    } else {
        done.saturating_mul(100) / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension(Path::new("clip.mp4")), Some("mp4"));
        assert_eq!(get_file_extension(Path::new("a/b/photo.jpg")), Some("jpg"));
        assert_eq!(get_file_extension(Path::new("clip")), None);
        assert_eq!(get_file_extension(Path::new(".gitignore")), None);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(0, 0), 100);
        assert_eq!(percent_of(1, 4), 25);
        assert_eq!(percent_of(4, 4), 100);
    }
}
