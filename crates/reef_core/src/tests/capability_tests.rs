use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::capability::CapabilityCell;

#[tokio::test]
async fn concurrent_callers_share_a_single_load() {
    let cell = Arc::new(CapabilityCell::<u32>::new());
    let load_count = Arc::new(AtomicUsize::new(0));

    let first = cell.get_or_load(|| async {
        load_count.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        Ok(7)
    });
    let second = cell.get_or_load(|| async {
        load_count.fetch_add(1, Ordering::SeqCst);
        Ok(8)
    });

    let (a, b) = tokio::join!(first, second);
    assert_eq!(a, b);
    assert_eq!(load_count.load(Ordering::SeqCst), 1);
    assert_eq!(cell.outcome(), Some(a));
}

#[tokio::test]
async fn failure_is_sticky_and_never_retried() {
    let cell = CapabilityCell::<u32>::new();
    let load_count = AtomicUsize::new(0);

    let first = cell
        .get_or_load(|| async {
            load_count.fetch_add(1, Ordering::SeqCst);
            Err(anyhow::anyhow!("resource failed to load"))
        })
        .await;
    assert!(first.is_err());

    // A later caller with a loader that would succeed still observes the
    // recorded failure; the loader does not run.
    let second = cell
        .get_or_load(|| async {
            load_count.fetch_add(1, Ordering::SeqCst);
            Ok(42)
        })
        .await;

    assert_eq!(first, second);
    assert_eq!(load_count.load(Ordering::SeqCst), 1);
    assert!(cell
        .outcome()
        .expect("outcome recorded")
        .expect_err("failure outcome")
        .contains("resource failed to load"));
}

#[tokio::test]
async fn successful_outcome_is_reused_across_mounts() {
    let cell = CapabilityCell::<String>::new();

    let first = cell
        .get_or_load(|| async { Ok("basemap".to_string()) })
        .await;
    let second = cell
        .get_or_load(|| async { Ok("different".to_string()) })
        .await;

    assert_eq!(first.as_deref(), Ok("basemap"));
    assert_eq!(second.as_deref(), Ok("basemap"));
}
