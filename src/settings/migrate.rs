//! Migration of the old flat settings keys into per-device blocks

use serde_json::{Map, Value};

use super::types::{DeviceType, SETTINGS_VERSION};

/// Where an old top-level key moves to
struct Rename {
    from: &'static str,
    /// Dotted path of the new location
    to: &'static str,
    /// Copy into `<device>.<to>` for every device tier
    per_device: bool,
}

const fn global(from: &'static str, to: &'static str) -> Rename {
    Rename { from, to, per_device: false }
}

const fn per_device(from: &'static str, to: &'static str) -> Rename {
    Rename { from, to, per_device: true }
}

const RENAMES: &[Rename] = &[
    global("desktopHeight", "desktop.height"),
    global("tabletHeight", "tablet.height"),
    global("mobileHeight", "phone.height"),
    per_device("offset", "noteOffset"),
    per_device("fade", "bannerFade"),
    per_device("radius", "bannerRadius"),
    per_device("padding", "bannerPadding"),
    per_device("noteOffset", "noteOffset"),
    per_device("bannerRadius", "bannerRadius"),
    per_device("bannerPadding", "bannerPadding"),
    per_device("bannerFade", "bannerFade"),
    per_device("iconEnabled", "iconEnabled"),
    per_device("iconSize", "iconSize"),
    per_device("iconRadius", "iconRadius"),
    per_device("iconBackground", "iconBackground"),
    per_device("iconBorder", "iconBorder"),
    per_device("iconAlignment", "iconAlignment"),
    per_device("iconOffset", "iconOffset"),
    global("propertyName", "properties.image"),
    global("imageProperty", "properties.image"),
    global("iconProperty", "properties.icon"),
];

/// Move old keys to their new place. Returns true if any key moved, which
/// is the only case where the file needs saving. A missing `version` is
/// filled in memory.
pub fn migrate(data: &mut Value) -> bool {
    let Some(root) = data.as_object_mut() else {
        return false;
    };

    let mut changed = false;
    for rename in RENAMES {
        let value = match root.remove(rename.from) {
            Some(Value::Null) | None => continue,
            Some(value) => value,
        };
        changed = true;

        if rename.per_device {
            for device in DeviceType::ALL {
                let path = format!("{}.{}", device.key(), rename.to);
                set_by_path(root, &path, value.clone());
            }
        } else {
            set_by_path(root, rename.to, value);
        }
    }

    let version = root.get("version").and_then(Value::as_u64).unwrap_or(0);
    if changed || version < u64::from(SETTINGS_VERSION) {
        root.insert("version".to_string(), Value::from(SETTINGS_VERSION));
    }

    changed
}

fn set_by_path(root: &mut Map<String, Value>, path: &str, value: Value) {
    let mut parts: Vec<&str> = path.split('.').collect();
    let Some(last) = parts.pop() else {
        return;
    };

    let mut current = root;
    for part in parts {
        let entry = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry.as_object_mut() {
            Some(map) => map,
            None => return,
        };
    }
    current.insert(last.to_string(), value);
}
