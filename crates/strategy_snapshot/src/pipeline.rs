use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};
use weekday_core::{
    BuildOutcome, ClassificationSet, LocaleDataService, LocaleTextService, OverrideRegistry,
    assemble, classify_all,
};

use crate::candidates::candidates_for;
use crate::config::{Paths, Tunables};
use crate::error::SnapshotError;

/// Classifies `candidates` in chunks on the blocking pool, at most
/// `tunables.workers` chunks at a time.
///
/// Chunks are merged back in candidate order, so the result does not depend
/// on which worker finishes first.
pub async fn classify_parallel<S>(
    service: Arc<S>,
    candidates: Vec<String>,
    tunables: &Tunables,
) -> Result<ClassificationSet, SnapshotError>
where
    S: LocaleTextService + 'static,
{
    let chunk_size = tunables.chunk_size.max(1);
    let semaphore = Arc::new(Semaphore::new(tunables.workers.max(1)));
    let mut tasks = JoinSet::new();

    let chunks = candidates
        .chunks(chunk_size)
        .map(<[String]>::to_vec)
        .collect::<Vec<_>>();
    let chunk_count = chunks.len();

    for (index, chunk) in chunks.into_iter().enumerate() {
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|err| SnapshotError::message(format!("worker pool closed: {err}")))?;
        let service = Arc::clone(&service);
        tasks.spawn_blocking(move || {
            let _permit = permit;
            let set = classify_all(service.as_ref(), &chunk);
            debug!(chunk = index, candidates = chunk.len(), classified = set.len(), "chunk classified");
            (index, set)
        });
    }

    let mut partials: Vec<Option<ClassificationSet>> = (0..chunk_count).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, set) = joined?;
        partials[index] = Some(set);
    }

    let mut merged = ClassificationSet::new();
    for set in partials.into_iter().flatten() {
        merged.merge(set);
    }
    Ok(merged)
}

/// Loads inputs, classifies, and folds in the override registry.
pub async fn build(paths: &Paths, tunables: &Tunables) -> Result<BuildOutcome, SnapshotError> {
    let service = Arc::new(LocaleDataService::load(&paths.locale_data)?);

    let mut registry = OverrideRegistry::builtin();
    if let Some(path) = paths.overrides.as_deref() {
        let added = registry.extend_from_file(path)?;
        info!(path = %path.display(), added, "override file applied");
    }

    let candidates = candidates_for(paths.candidates.as_deref(), &service)?;
    info!(
        candidates = candidates.len(),
        workers = tunables.workers,
        chunk_size = tunables.chunk_size,
        "classifying candidates"
    );

    let set = classify_parallel(service, candidates, tunables).await?;
    Ok(assemble(set, &registry)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> Arc<LocaleDataService> {
        Arc::new(
            LocaleDataService::new()
                .with_locale(
                    "en",
                    ["S", "M", "T", "W", "T", "F", "S"],
                    ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
                )
                .with_locale(
                    "es",
                    ["D", "L", "M", "X", "J", "V", "S"],
                    ["dom", "lun", "mar", "mié", "jue", "vie", "sáb"],
                )
                .with_locale(
                    "pt",
                    ["D", "S", "T", "Q", "Q", "S", "S"],
                    ["dom.", "seg.", "ter.", "qua.", "qui.", "sex.", "sáb."],
                )
                .with_locale(
                    "ro",
                    ["D", "L", "M", "M", "J", "V", "S"],
                    ["dum.", "lun.", "mar.", "mie.", "joi", "vin.", "sâm."],
                )
                .with_alias("mo", "ro"),
        )
    }

    fn candidates() -> Vec<String> {
        [
            "en-US", "es", "en", "pt-BR", "mo", "xx", "ro", "pt", "es-MX", "en-GB",
        ]
        .map(String::from)
        .to_vec()
    }

    #[tokio::test]
    async fn parallel_matches_sequential_for_any_chunking() {
        let service = service();
        let sequential = classify_all(service.as_ref(), candidates());
        let expected = assemble(sequential, &OverrideRegistry::empty()).unwrap();

        for (workers, chunk_size) in [(1, 1), (2, 3), (4, 2), (8, 100)] {
            let tunables = Tunables {
                workers,
                chunk_size,
            };
            let set = classify_parallel(service.clone(), candidates(), &tunables)
                .await
                .unwrap();
            let outcome = assemble(set, &OverrideRegistry::empty()).unwrap();
            assert_eq!(outcome.database, expected.database, "{tunables:?}");
            assert_eq!(outcome.counts, expected.counts, "{tunables:?}");
        }
    }

    #[tokio::test]
    async fn first_requested_id_wins_across_chunks() {
        let tunables = Tunables {
            workers: 4,
            chunk_size: 1,
        };
        let set = classify_parallel(service(), candidates(), &tunables)
            .await
            .unwrap();

        let en = weekday_core::LocaleId::parse("en").unwrap();
        assert_eq!(set.get(&en).unwrap().requested, "en-US");
        let counts = set.counts();
        assert_eq!(counts.candidates, 10);
        assert_eq!(counts.unsupported, 1);
        assert_eq!(counts.language_mismatch, 1);
        assert_eq!(counts.duplicate_canonical, 4);
    }

    #[tokio::test]
    async fn empty_candidate_list_yields_empty_set() {
        let tunables = Tunables {
            workers: 2,
            chunk_size: 8,
        };
        let set = classify_parallel(service(), Vec::new(), &tunables)
            .await
            .unwrap();
        assert!(set.is_empty());
    }
}
