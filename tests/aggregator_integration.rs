//! Aggregator integration tests
//!
//! Runs discovery and manifest regeneration against real directory trees
//! in temporary directories.

use partialgen::{
    Aggregator, AggregatorConfig, ManifestStatus, PartialOrdering, RealFileSystem,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const BANNER: &str = "// This file imports all other underscore-prefixed .scss files in this directory and sub-directories.\n\
// It is automatically generated by partialgen. Do not directly modify this file.\n\n";

fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

fn pattern(root: &Path, suffix: &str) -> String {
    format!("{}/{}", root.display(), suffix)
}

#[tokio::test]
async fn test_regenerates_manifest_from_tree() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let manifest = write(root, "src/scss/__all.scss", "// old\n");
    write(root, "src/scss/_a.scss", "");
    write(root, "src/scss/sub/_b.scss", "");
    write(root, "src/scss/sub/not-a-partial.txt", "");
    write(root, "src/scss/compile.scss", "");

    let aggregator = Aggregator::new(AggregatorConfig::default());
    let report = aggregator
        .aggregate_all(&pattern(root, "src/scss/**/__all.scss"))
        .await
        .unwrap();

    assert_eq!(report.manifests.len(), 1);
    assert_eq!(report.manifests[0].status, ManifestStatus::Written);
    assert_eq!(report.manifests[0].imports, 2);
    assert_eq!(
        fs::read_to_string(&manifest).unwrap(),
        format!("{}@import \"a\";\n@import \"sub/b\";\n", BANNER)
    );
}

#[tokio::test]
async fn test_second_run_is_unchanged() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let manifest = write(root, "styles/__all.scss", "");
    write(root, "styles/_z.scss", "");
    write(root, "styles/widgets/_card.scss", "");
    let aggregator = Aggregator::new(AggregatorConfig::default());
    let glob = pattern(root, "styles/**/__all.scss");

    aggregator.aggregate_all(&glob).await.unwrap();
    let first = fs::read_to_string(&manifest).unwrap();
    let report = aggregator.aggregate_all(&glob).await.unwrap();

    assert_eq!(report.count(ManifestStatus::Unchanged), 1);
    assert_eq!(fs::read_to_string(&manifest).unwrap(), first);
}

#[tokio::test]
async fn test_manifest_without_partials_gets_banner_only() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let manifest = write(root, "styles/__all.scss", "@import \"removed\";\n");
    write(root, "styles/readme.md", "");

    let aggregator = Aggregator::new(AggregatorConfig::default());
    let report = aggregator
        .aggregate_all(&pattern(root, "styles/**/__all.scss"))
        .await
        .unwrap();

    assert_eq!(report.manifests[0].imports, 0);
    assert_eq!(fs::read_to_string(&manifest).unwrap(), BANNER);
}

#[tokio::test]
async fn test_nested_manifests_are_regenerated_independently() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let outer = write(root, "src/scss/__all.scss", "");
    let inner = write(root, "src/scss/components/__all.scss", "");
    write(root, "src/scss/_base.scss", "");
    write(root, "src/scss/components/_button.scss", "");

    let aggregator = Aggregator::new(AggregatorConfig::default());
    let report = aggregator
        .aggregate_all(&pattern(root, "src/scss/**/__all.scss"))
        .await
        .unwrap();

    assert_eq!(report.count(ManifestStatus::Written), 2);
    assert_eq!(
        fs::read_to_string(&outer).unwrap(),
        format!(
            "{}@import \"base\";\n@import \"components/button\";\n",
            BANNER
        )
    );
    assert_eq!(
        fs::read_to_string(&inner).unwrap(),
        format!("{}@import \"button\";\n", BANNER)
    );
}

#[tokio::test]
async fn test_sorted_ordering_is_stable_across_creation_order() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let manifest = write(root, "styles/__all.scss", "");
    write(root, "styles/z/_last.scss", "");
    write(root, "styles/_b.scss", "");
    write(root, "styles/a/_first.scss", "");
    write(root, "styles/_a.scss", "");

    let aggregator = Aggregator::new(AggregatorConfig {
        ordering: PartialOrdering::Sorted,
        ..Default::default()
    });
    aggregator
        .aggregate_all(&pattern(root, "styles/__all.scss"))
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(&manifest).unwrap(),
        format!(
            "{}@import \"a\";\n@import \"b\";\n@import \"a/first\";\n@import \"z/last\";\n",
            BANNER
        )
    );
}

#[tokio::test]
async fn test_check_mode_leaves_files_untouched() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let manifest = write(root, "styles/__all.scss", "outdated");
    write(root, "styles/_a.scss", "");

    let aggregator = Aggregator::new(AggregatorConfig {
        dry_run: true,
        ..Default::default()
    });
    let report = aggregator
        .aggregate_all(&pattern(root, "styles/**/__all.scss"))
        .await
        .unwrap();

    assert!(report.has_stale());
    assert_eq!(fs::read_to_string(&manifest).unwrap(), "outdated");
}

#[tokio::test]
async fn test_unmatched_pattern_is_a_noop() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "styles/_a.scss", "");

    let aggregator = Aggregator::new(AggregatorConfig::default());
    let report = aggregator
        .aggregate_all(&pattern(root, "styles/**/__all.scss"))
        .await
        .unwrap();

    assert!(report.is_empty());
    assert!(!root.join("styles/__all.scss").exists());
}

#[tokio::test]
async fn test_custom_manifest_name_and_extension() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let manifest = write(root, "sass/_index.sass", "");
    write(root, "sass/_grid.sass", "");
    write(root, "sass/_ignored.scss", "");

    let aggregator = Aggregator::new(AggregatorConfig {
        extension: ".sass".to_string(),
        manifest_name: "_index.sass".to_string(),
        ..Default::default()
    });
    let report = aggregator
        .aggregate_all(&pattern(root, "sass/**/_index.sass"))
        .await
        .unwrap();

    assert_eq!(report.manifests[0].imports, 1);
    assert!(fs::read_to_string(&manifest)
        .unwrap()
        .ends_with("@import \"grid\";\n"));
}

#[tokio::test]
async fn test_manifest_name_mismatch_never_self_imports() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let manifest = write(root, "styles/__all.scss", "// hand written\n");
    write(root, "styles/_a.scss", "");

    let aggregator = Aggregator::new(AggregatorConfig {
        manifest_name: "_index.scss".to_string(),
        ..Default::default()
    });
    let report = aggregator
        .aggregate_all(&pattern(root, "styles/**/__all.scss"))
        .await
        .unwrap();
    assert!(report.is_empty());
    assert_eq!(fs::read_to_string(&manifest).unwrap(), "// hand written\n");

    let direct = aggregator.regenerate_manifest(&manifest).unwrap();
    assert_eq!(direct.imports, 1);
    let contents = fs::read_to_string(&manifest).unwrap();
    assert!(!contents.contains("@import \"_all\";"));
    assert!(contents.ends_with("\n\n@import \"a\";\n"));
}

#[tokio::test]
async fn test_loose_pattern_only_rewrites_manifests() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let manifest = write(root, "src/__all.scss", "");
    let partial = write(root, "src/_theme.scss", "$accent: red;\n");
    let nested = write(root, "src/parts/_grid.scss", ".grid {}\n");

    let aggregator = Aggregator::new(AggregatorConfig::default());
    let report = aggregator
        .aggregate_all(&pattern(root, "src/**/*.scss"))
        .await
        .unwrap();

    assert_eq!(report.manifests.len(), 1);
    assert_eq!(report.manifests[0].manifest, manifest);
    assert_eq!(fs::read_to_string(&partial).unwrap(), "$accent: red;\n");
    assert_eq!(fs::read_to_string(&nested).unwrap(), ".grid {}\n");
}

#[test]
fn test_discover_partials_with_shared_fs() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "_one.scss", "");
    write(root, "deep/er/_two.scss", "");

    let aggregator = Aggregator::with_fs(
        Arc::new(RealFileSystem::new()),
        AggregatorConfig::default(),
    );
    let partials = aggregator.discover_partials(root).unwrap();

    let identifiers: Vec<&str> = partials.iter().map(|p| p.identifier.as_str()).collect();
    assert_eq!(identifiers, vec!["one", "deep/er/two"]);
}

#[tokio::test]
#[cfg(unix)]
async fn test_unreadable_directory_fails_only_its_manifest() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let good = write(root, "src/good/__all.scss", "");
    write(root, "src/good/_ok.scss", "");
    write(root, "src/bad/__all.scss", "");
    write(root, "src/bad/locked/_hidden.scss", "");

    let locked = root.join("src/bad/locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not restrict privileged users
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let aggregator = Aggregator::new(AggregatorConfig::default());
    let report = aggregator
        .aggregate_all(&pattern(root, "src/**/__all.scss"))
        .await
        .unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(report.manifests.len(), 2);
    assert_eq!(report.count(ManifestStatus::Failed), 1);
    assert_eq!(report.count(ManifestStatus::Written), 1);
    assert!(fs::read_to_string(&good)
        .unwrap()
        .contains("@import \"ok\";"));
}
