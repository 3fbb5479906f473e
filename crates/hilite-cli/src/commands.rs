//! Command implementations, kept apart from argument parsing for testing.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use hilite_core::{ItemId, SummaryConfig};
use hilite_engine::{RunReport, Summarizer};
use hilite_library::{LibrarySnapshot, MemoryLibrary};

/// Options for `hilite run`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub library: PathBuf,
    pub item: Option<ItemId>,
    pub color: Option<String>,
    pub config: Option<PathBuf>,
    pub dry_run: bool,
    pub output: Option<PathBuf>,
}

/// Resolve configuration: explicit file, else `HILITE_CONFIG`/env, then `--color`.
pub fn resolve_config(config: Option<&PathBuf>, color: Option<&str>) -> Result<SummaryConfig> {
    let mut resolved = match config {
        Some(path) => SummaryConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SummaryConfig::load().context("Failed to load config from environment")?,
    };

    if let Some(color) = color {
        resolved = resolved.with_color(color);
        resolved.validate()?;
    }
    Ok(resolved)
}

/// Load a snapshot, run the summarizer on the selected item, write the result.
pub async fn run(options: RunOptions) -> Result<RunReport> {
    let config = resolve_config(options.config.as_ref(), options.color.as_deref())?;

    let snapshot = LibrarySnapshot::load(&options.library)
        .await
        .with_context(|| format!("Failed to load library {}", options.library.display()))?;
    let original_selection = snapshot.selected;

    let library = MemoryLibrary::from_snapshot(snapshot)?;
    if let Some(item) = options.item {
        library.select(Some(item))?;
    }

    let summarizer = Summarizer::new(Arc::new(library.clone()), config);
    let report = summarizer.run().await;

    if options.dry_run {
        info!("Dry run, library file left unchanged");
        return Ok(report);
    }

    // An explicit output is always produced; the input is only rewritten on change
    let target = match &options.output {
        Some(output) => output,
        None if report.has_changes() => &options.library,
        None => {
            debug!("No changes to write");
            return Ok(report);
        }
    };

    let mut updated = library.snapshot();
    updated.selected = original_selection;
    updated
        .save(target)
        .await
        .with_context(|| format!("Failed to write library {}", target.display()))?;
    info!(path = %target.display(), "Library written");

    Ok(report)
}

/// Bodies of the live notes under `item`.
pub async fn show(library: &PathBuf, item: ItemId) -> Result<Vec<String>> {
    let snapshot = LibrarySnapshot::load(library)
        .await
        .with_context(|| format!("Failed to load library {}", library.display()))?;
    let library = MemoryLibrary::from_snapshot(snapshot)?;
    Ok(library.note_bodies(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilite_core::{Annotation, AnnotationType, AttachmentKind, Item};
    use hilite_engine::RunOutcome;

    async fn write_fixture(dir: &std::path::Path) -> (PathBuf, PathBuf) {
        let library = MemoryLibrary::new()
            .with_item(Item::regular(1, "ITEM0001", "A Book"))
            .with_item(Item::attachment(
                2,
                "ATT00002",
                Some(1),
                AttachmentKind::Pdf,
                Some("Paper".into()),
            ))
            .with_annotations(
                2,
                vec![
                    Annotation::new("ANNO0001", AnnotationType::Highlight, "#ffd400", "yellow")
                        .with_page_index(0),
                    Annotation::new("ANNO0002", AnnotationType::Highlight, "#5fb236", "green")
                        .with_page_index(1),
                ],
            );

        let library_path = dir.join("library.json");
        library.snapshot().save(&library_path).await.unwrap();

        let config_path = dir.join("hilite.toml");
        std::fs::write(&config_path, "[summary]\ntarget_color = \"#ffd400\"\n").unwrap();

        (library_path, config_path)
    }

    fn options(library: PathBuf, config: PathBuf) -> RunOptions {
        RunOptions {
            library,
            item: Some(1),
            color: None,
            config: Some(config),
            dry_run: false,
            output: None,
        }
    }

    #[tokio::test]
    async fn test_run_writes_summary_into_library() {
        let dir = tempfile::tempdir().unwrap();
        let (library, config) = write_fixture(dir.path()).await;

        let report = run(options(library.clone(), config)).await.unwrap();
        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.created_notes.len(), 1);

        let bodies = show(&library, 1).await.unwrap();
        assert_eq!(bodies.len(), 1);
        assert!(bodies[0].starts_with("<h2>Ord og forkortelser (#ffd400) from Paper</h2>"));

        // Selection from --item is not persisted
        let snapshot = LibrarySnapshot::load(&library).await.unwrap();
        assert_eq!(snapshot.selected, None);
    }

    #[tokio::test]
    async fn test_color_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let (library, config) = write_fixture(dir.path()).await;

        let mut opts = options(library.clone(), config);
        opts.color = Some("#5fb236".to_string());
        run(opts).await.unwrap();

        let bodies = show(&library, 1).await.unwrap();
        assert_eq!(bodies.len(), 1);
        assert!(bodies[0].contains("green"));
        assert!(!bodies[0].contains("yellow"));
    }

    #[tokio::test]
    async fn test_invalid_color_flag_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (library, config) = write_fixture(dir.path()).await;

        let mut opts = options(library, config);
        opts.color = Some("green".to_string());
        assert!(run(opts).await.is_err());
    }

    #[tokio::test]
    async fn test_dry_run_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let (library, config) = write_fixture(dir.path()).await;
        let before = std::fs::read_to_string(&library).unwrap();

        let mut opts = options(library.clone(), config);
        opts.dry_run = true;
        let report = run(opts).await.unwrap();

        assert_eq!(report.created_notes.len(), 1);
        assert_eq!(std::fs::read_to_string(&library).unwrap(), before);
    }

    #[tokio::test]
    async fn test_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let (library, config) = write_fixture(dir.path()).await;
        let output = dir.path().join("out.json");

        let mut opts = options(library.clone(), config);
        opts.output = Some(output.clone());
        run(opts).await.unwrap();

        assert!(show(&library, 1).await.unwrap().is_empty());
        assert_eq!(show(&output, 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_output_written_when_nothing_changed() {
        let dir = tempfile::tempdir().unwrap();
        let library = MemoryLibrary::new().with_item(Item::regular(1, "ITEM0001", "A Book"));
        let library_path = dir.path().join("library.json");
        library.snapshot().save(&library_path).await.unwrap();
        let config = dir.path().join("hilite.toml");
        std::fs::write(&config, "[summary]\ntarget_color = \"#ffd400\"\n").unwrap();
        let output = dir.path().join("out.json");

        let mut opts = options(library_path.clone(), config);
        opts.output = Some(output.clone());
        let report = run(opts).await.unwrap();

        assert_eq!(report.outcome, RunOutcome::NoAttachments);
        assert!(output.exists());
        let written = LibrarySnapshot::load(&output).await.unwrap();
        assert_eq!(written.items.len(), 1);
        assert_eq!(written.selected, None);
    }

    #[tokio::test]
    async fn test_unchanged_library_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let (library, config) = write_fixture(dir.path()).await;

        let mut opts = options(library.clone(), config);
        opts.color = Some("#2ea8e5".to_string());
        let before = std::fs::read_to_string(&library).unwrap();
        let report = run(opts).await.unwrap();

        assert!(!report.has_changes());
        assert_eq!(std::fs::read_to_string(&library).unwrap(), before);
    }

    #[tokio::test]
    async fn test_repeat_runs_keep_one_summary() {
        let dir = tempfile::tempdir().unwrap();
        let (library, config) = write_fixture(dir.path()).await;

        run(options(library.clone(), config.clone())).await.unwrap();
        let second = run(options(library.clone(), config)).await.unwrap();

        assert_eq!(second.deleted_notes.len(), 1);
        assert_eq!(show(&library, 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_item_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (library, config) = write_fixture(dir.path()).await;

        let mut opts = options(library, config);
        opts.item = Some(99);
        assert!(run(opts).await.is_err());
    }
}
