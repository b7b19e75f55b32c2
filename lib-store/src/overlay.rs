//! Buffered-write overlay shared by the store backends.

use std::collections::BTreeMap;

/// Pending writes per namespace: `Some(value)` is a set, `None` a delete.
pub(crate) type Overlay = BTreeMap<String, BTreeMap<Vec<u8>, Option<Vec<u8>>>>;

/// Look up a key in the overlay. Outer `None` means the overlay has no
/// opinion and the base store decides.
pub(crate) fn overlay_get<'a>(
    overlay: &'a Overlay,
    ns: &str,
    key: &[u8],
) -> Option<&'a Option<Vec<u8>>> {
    overlay.get(ns).and_then(|tree| tree.get(key))
}

/// Merge base pairs with overlay entries under `prefix`, preserving
/// ascending key order.
pub(crate) fn merge_prefix(
    base: Vec<(Vec<u8>, Vec<u8>)>,
    overlay: &Overlay,
    ns: &str,
    prefix: &[u8],
) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = base.into_iter().collect();
    if let Some(tree) = overlay.get(ns) {
        for (key, entry) in tree.range(prefix.to_vec()..) {
            if !key.starts_with(prefix) {
                break;
            }
            match entry {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
    }
    merged.into_iter().collect()
}
