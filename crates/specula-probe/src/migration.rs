//! Schema migration for persisted planar probe data.
//!
//! Migration is an explicit pass run by the loader after decoding and before
//! the data is used to build a probe.

use crate::persist::PlanarProbeData;

/// Schema version written by this crate.
pub const CURRENT_VERSION: u32 = 2;

type MigrationStep = fn(&mut PlanarProbeData);

/// Each step upgrades data older than its version. Kept in ascending order.
const STEPS: &[(u32, &str, MigrationStep)] = &[(2, "offset sphere", migrate_offset_sphere)];

fn migrate_offset_sphere(data: &mut PlanarProbeData) {
    data.influence_volume.migrate_offset_sphere();
}

/// Upgrades `data` from `stored_version` and returns the version it is now at.
///
/// Data already at [`CURRENT_VERSION`] is left untouched. Data from a newer
/// schema is passed through unchanged and reported as current.
pub fn migrate(stored_version: u32, data: &mut PlanarProbeData) -> u32 {
    if stored_version == CURRENT_VERSION {
        return CURRENT_VERSION;
    }

    if stored_version > CURRENT_VERSION {
        log::warn!(
            "Probe data has schema version {} newer than supported {}, loading as-is",
            stored_version,
            CURRENT_VERSION
        );
        return CURRENT_VERSION;
    }

    for &(version, name, step) in STEPS {
        if stored_version < version {
            log::info!(
                "Migrating probe data from version {} ({})",
                stored_version,
                name
            );
            step(data);
        }
    }

    CURRENT_VERSION
}
