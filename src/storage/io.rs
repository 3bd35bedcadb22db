use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use tracing::debug;

const EXT: &str = "json";

pub(crate) fn collection_path(root: &Path, name: &str) -> std::path::PathBuf {
    root.join(format!("{}.{}", name, EXT))
}

/// Load every `<name>.json` collection file under `root`. Leftover temp
/// files from an interrupted write are ignored.
pub(crate) fn load_collections(root: &Path) -> Result<HashMap<String, BTreeMap<String, JsonValue>>> {
    let mut out = HashMap::new();
    for entry in fs::read_dir(root)? {
        let p = entry?.path();
        if !p.is_file() || p.extension().and_then(|e| e.to_str()) != Some(EXT) { continue; }
        let Some(name) = p.file_stem().and_then(|s| s.to_str()) else { continue };
        let bytes = fs::read(&p)?;
        let docs: BTreeMap<String, JsonValue> = serde_json::from_slice(&bytes)
            .with_context(|| format!("unreadable collection file {}", p.display()))?;
        debug!(target: "dormhub::storage", "loaded collection '{}' docs={}", name, docs.len());
        out.insert(name.to_string(), docs);
    }
    Ok(out)
}

pub(crate) fn write_collection(root: &Path, name: &str, docs: &BTreeMap<String, JsonValue>) -> Result<()> {
    let path = collection_path(root, name);
    let bytes = serde_json::to_vec_pretty(docs)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}
