//! XML/JSON duplicate resolution.
//!
//! A resource is often published twice, once per serialization format, as
//! `name.xml` next to `name.json`. Files are grouped by their path with the
//! extension removed (the *logical identity*); a pair is reduced to one
//! member according to the [`DuplicateFilePreference`].
//!
//! Files that are neither XML nor JSON are never grouped and always pass
//! through.

use camino::{Utf8Path, Utf8PathBuf};
use dirsrc_core::{DuplicateFilePreference, FxHashMap, fx_hash_map, fx_hash_set};
use dirsrc_summary::DocumentFormat;
use tracing::warn;

/// Returns the logical identity of `path`: the path without its extension.
#[must_use]
pub fn logical_identity(path: &Utf8Path) -> Utf8PathBuf {
    path.with_extension("")
}

/// Applies `preference` to every XML/JSON pair in `paths`.
///
/// The result keeps the relative order of `paths`. Groups of more than two
/// members (possible on case-sensitive filesystems, e.g. `a.xml`, `a.XML`,
/// `a.json`) are kept whole and logged.
///
/// # Examples
///
/// ```
/// use dirsrc_core::DuplicateFilePreference;
/// use dirsrc_index::resolve_duplicates;
/// use camino::Utf8PathBuf;
///
/// let paths = vec![Utf8PathBuf::from("/d/a.json"), Utf8PathBuf::from("/d/a.xml")];
/// let kept = resolve_duplicates(&paths, DuplicateFilePreference::PreferXml);
/// assert_eq!(kept, vec![Utf8PathBuf::from("/d/a.xml")]);
/// ```
#[must_use]
pub fn resolve_duplicates(paths: &[Utf8PathBuf], preference: DuplicateFilePreference) -> Vec<Utf8PathBuf> {
    let mut groups: FxHashMap<Utf8PathBuf, Vec<&Utf8PathBuf>> = fx_hash_map();
    for path in paths.iter().filter(|p| DocumentFormat::from_path(p).is_some()) {
        groups.entry(logical_identity(path)).or_default().push(path);
    }

    let mut dropped = fx_hash_set();
    for (identity, members) in &groups {
        match members.len() {
            2 => {
                let kept = select_member(members, preference);
                dropped.extend(members.iter().copied().filter(|m| !kept.contains(m)));
            }
            n if n > 2 => {
                warn!(identity = %identity, members = n, "Keeping every file of an oversized duplicate group");
            }
            _ => {}
        }
    }

    paths.iter().filter(|p| !dropped.contains(p)).cloned().collect()
}

/// Selects the surviving members of a two-member group.
fn select_member<'a>(members: &[&'a Utf8PathBuf], preference: DuplicateFilePreference) -> Vec<&'a Utf8PathBuf> {
    let wanted = match preference {
        DuplicateFilePreference::KeepBoth => return members.to_vec(),
        DuplicateFilePreference::PreferXml => DocumentFormat::Xml,
        DuplicateFilePreference::PreferJson => DocumentFormat::Json,
    };

    members
        .iter()
        .copied()
        .find(|m| DocumentFormat::from_path(m) == Some(wanted))
        .or_else(|| members.last().copied())
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(list: &[&str]) -> Vec<Utf8PathBuf> {
        list.iter().map(Utf8PathBuf::from).collect()
    }

    #[test]
    fn test_prefer_xml_keeps_xml_member() {
        let kept = resolve_duplicates(
            &paths(&["/d/a.json", "/d/a.xml", "/d/b.json"]),
            DuplicateFilePreference::PreferXml,
        );
        assert_eq!(kept, paths(&["/d/a.xml", "/d/b.json"]));
    }

    #[test]
    fn test_prefer_json_keeps_json_member() {
        let kept = resolve_duplicates(
            &paths(&["/d/a.json", "/d/a.xml", "/d/c.xml"]),
            DuplicateFilePreference::PreferJson,
        );
        assert_eq!(kept, paths(&["/d/a.json", "/d/c.xml"]));
    }

    #[test]
    fn test_keep_both_keeps_pairs() {
        let input = paths(&["/d/a.json", "/d/a.xml"]);
        assert_eq!(resolve_duplicates(&input, DuplicateFilePreference::KeepBoth), input);
    }

    #[test]
    fn test_extension_case_is_ignored_for_format() {
        let kept = resolve_duplicates(&paths(&["/d/a.JSON", "/d/a.Xml"]), DuplicateFilePreference::PreferXml);
        assert_eq!(kept, paths(&["/d/a.Xml"]));
    }

    #[test]
    fn test_same_stem_in_different_directories_is_not_a_pair() {
        let input = paths(&["/d/x/a.json", "/d/y/a.xml"]);
        assert_eq!(resolve_duplicates(&input, DuplicateFilePreference::PreferXml), input);
    }

    #[test]
    fn test_other_formats_pass_through() {
        let input = paths(&["/d/a.txt", "/d/a.xml", "/d/readme"]);
        assert_eq!(resolve_duplicates(&input, DuplicateFilePreference::PreferJson), input);
    }

    #[test]
    fn test_pair_without_preferred_format_keeps_last_member() {
        let members = paths(&["/d/a.xml", "/d/A.xml"]);
        let refs: Vec<&Utf8PathBuf> = members.iter().collect();

        let kept = select_member(&refs, DuplicateFilePreference::PreferJson);

        assert_eq!(kept, vec![&members[1]]);
    }

    #[test]
    fn test_oversized_group_is_kept_whole() {
        let input = paths(&["/d/a.XML", "/d/a.json", "/d/a.xml"]);
        assert_eq!(resolve_duplicates(&input, DuplicateFilePreference::PreferXml), input);
    }

    #[test]
    fn test_logical_identity() {
        assert_eq!(logical_identity(Utf8Path::new("/d/a.xml")), Utf8PathBuf::from("/d/a"));
        assert_eq!(logical_identity(Utf8Path::new("/d/a.b.json")), Utf8PathBuf::from("/d/a.b"));
    }
}
