use codespan_reporting::files::SimpleFiles;
use fxhash::FxHashMap;

/// Source texts kept around for rendering diagnostics with snippets.
///
/// Parsing itself never needs this: the cursor streams bytes from its reader.
/// Front ends that want rich diagnostics register the document text here
/// under the same name they gave the cursor.
pub struct SourceMap {
    files: SimpleFiles<String, String>,
    file_names: FxHashMap<String, usize>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            file_names: Default::default(),
        }
    }

    pub fn add_source(&mut self, name: String, contents: String) -> usize {
        let id = self.files.add(name.clone(), contents);
        self.file_names.insert(name, id);

        id
    }

    pub fn get_by_name(&self, name: impl AsRef<str>) -> Option<usize> {
        self.file_names.get(name.as_ref()).copied()
    }

    pub fn files(&self) -> &SimpleFiles<String, String> {
        &self.files
    }
}

impl Default for SourceMap {
    fn default() -> Self {
        Self::new()
    }
}
