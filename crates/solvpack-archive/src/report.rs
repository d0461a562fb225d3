use std::path::PathBuf;

#[derive(Clone, Debug, Default)]
pub struct ExtractReport {
    pub entry_count: usize,
    pub total_bytes: u64,
    pub entries: Vec<ExtractedEntry>,
}

#[derive(Clone, Debug)]
pub struct ExtractedEntry {
    pub original_name: String,
    pub target_path: PathBuf,
    pub size: u64,
    pub permissions: Option<u32>,
    pub is_directory: bool,
}

impl ExtractReport {
    pub(crate) fn push(&mut self, entry: ExtractedEntry) {
        self.entry_count += 1;
        self.total_bytes += entry.size;
        self.entries.push(entry);
    }

    /// Extracted regular files, skipping directory entries.
    pub fn files(&self) -> impl Iterator<Item = &ExtractedEntry> {
        self.entries.iter().filter(|e| !e.is_directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_accumulates() {
        let mut report = ExtractReport::default();
        report.push(ExtractedEntry {
            original_name: "bin/".into(),
            target_path: PathBuf::from("/x/bin"),
            size: 0,
            permissions: None,
            is_directory: true,
        });
        report.push(ExtractedEntry {
            original_name: "bin/cbc".into(),
            target_path: PathBuf::from("/x/bin/cbc"),
            size: 1024,
            permissions: Some(0o755),
            is_directory: false,
        });

        assert_eq!(report.entry_count, 2);
        assert_eq!(report.total_bytes, 1024);
        assert_eq!(report.files().count(), 1);
    }
}
