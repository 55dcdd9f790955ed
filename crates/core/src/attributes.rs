//! Well-known manifest and signature-file attribute names.
//!
//! All names are lower-cased, matching how the parser stores them.

use std::collections::BTreeMap;

use crate::digest::DigestAlgorithm;

pub const MANIFEST_VERSION: &str = "manifest-version";
pub const SIGNATURE_VERSION: &str = "signature-version";
/// First attribute of every entry block; its value is the entry name.
pub const NAME: &str = "name";
pub const CREATED_BY: &str = "created-by";
pub const ANDROID_APK_SIGNED: &str = "x-android-apk-signed";

/// Per-entry digest, e.g. `SHA-256-Digest`.
pub const DIGEST_SUFFIX: &str = "-digest";
/// Whole-manifest digest in a signature file, e.g. `SHA-256-Digest-Manifest`.
pub const DIGEST_MANIFEST_SUFFIX: &str = "-digest-manifest";
/// Digest of the manifest's main section in a signature file.
pub const DIGEST_MAIN_ATTRIBUTES_SUFFIX: &str = "-digest-manifest-main-attributes";

/// Conventional path of the manifest inside an archive.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Collect `<ALG><suffix>` attributes whose algorithm is recognised.
///
/// Attributes with unknown algorithm prefixes are skipped.
pub fn digest_attributes<'a>(
    attributes: &'a BTreeMap<String, String>,
    suffix: &str,
) -> Vec<(DigestAlgorithm, &'a str)> {
    let mut out: Vec<_> = attributes
        .iter()
        .filter_map(|(key, value)| {
            let prefix = key.strip_suffix(suffix)?;
            let algorithm = DigestAlgorithm::from_attribute_prefix(prefix)?;
            Some((algorithm, value.as_str()))
        })
        .collect();
    out.sort_by_key(|(algorithm, _)| *algorithm);
    out
}
