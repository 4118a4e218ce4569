use crate::models::LicenseRisk;

/// Classify a single canonical SPDX identifier into a risk level.
pub fn classify_spdx_id(id: &str) -> LicenseRisk {
    match id.trim() {
        // Permissive
        "MIT"
        | "Apache-2.0"
        | "BSD-2-Clause"
        | "BSD-3-Clause"
        | "BSD-3-Clause-Clear"
        | "0BSD"
        | "ISC"
        | "Unlicense"
        | "Zlib"
        | "CC0-1.0"
        | "WTFPL"
        | "AFL-3.0"
        | "MS-PL"
        | "Artistic-2.0" => LicenseRisk::Permissive,

        // Weak copyleft
        "LGPL-2.1" | "LGPL-3.0" | "MPL-2.0" | "EPL-1.0" | "MS-RL" | "OSL-3.0" | "OFL-1.1" => {
            LicenseRisk::WeakCopyleft
        }

        // Strong copyleft
        "GPL-2.0" | "GPL-3.0" | "AGPL-3.0" => LicenseRisk::StrongCopyleft,

        _ => LicenseRisk::Unknown,
    }
}
