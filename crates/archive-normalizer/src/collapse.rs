use std::collections::BTreeMap;

use sitehost_core_types::SitePath;
use tracing::debug;

/// Repeatedly promotes the contents of a lone top-level directory.
///
/// Returns the flattened tree and how many wrapper levels were removed. Stops when the
/// top level is empty, holds more than one name, or holds a file.
pub fn collapse_wrappers<V>(mut files: BTreeMap<SitePath, V>) -> (BTreeMap<SitePath, V>, usize) {
    let mut levels = 0;
    while let Some(wrapper) = single_wrapper_dir(&files) {
        debug!(wrapper = %wrapper, level = levels + 1, "collapsing wrapper directory");
        files = files
            .into_iter()
            .filter_map(|(path, value)| path.strip_first_segment().map(|inner| (inner, value)))
            .collect();
        levels += 1;
    }
    (files, levels)
}

fn single_wrapper_dir<V>(files: &BTreeMap<SitePath, V>) -> Option<String> {
    let mut top: Option<&str> = None;
    for path in files.keys() {
        if path.depth() == 1 {
            return None;
        }
        match top {
            None => top = Some(path.first_segment()),
            Some(name) if name == path.first_segment() => {}
            Some(_) => return None,
        }
    }
    top.map(str::to_string)
}
