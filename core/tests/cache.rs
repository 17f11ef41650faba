use rosstat_core::{cache::DatasetCache, config::DashboardConfig, dashboard::Dashboard};
use std::sync::Arc;
use std::thread;

#[test]
fn dataset_is_generated_once() {
    let cache = DatasetCache::new(DashboardConfig::default_test());
    assert!(!cache.is_initialized());

    let a = cache.get().unwrap();
    assert!(cache.is_initialized());
    let b = cache.get().unwrap();
    assert!(Arc::ptr_eq(&a, &b), "second read must hit the cache");
    assert_eq!(a.seed(), 42);
}

#[test]
fn concurrent_readers_share_one_snapshot() {
    let cache = Arc::new(DatasetCache::new(DashboardConfig::default_test()));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.get().unwrap())
        })
        .collect();
    let snapshots: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for s in &snapshots[1..] {
        assert!(Arc::ptr_eq(&snapshots[0], s));
    }
}

#[test]
fn sessions_share_the_cached_dataset() {
    let cache = DatasetCache::new(DashboardConfig::default_test());
    let mut first = Dashboard::from_cache(&cache).unwrap();
    let second = Dashboard::from_cache(&cache).unwrap();

    first.handle(rosstat_core::view::ViewRequest::PostMessage { text: "привет".into() });
    assert_eq!(first.chat().len(), 1);
    assert!(second.chat().is_empty(), "chat log is per session");
    assert!(std::ptr::eq(first.dataset(), second.dataset()));
}

#[test]
fn invalid_config_surfaces_on_first_read() {
    let mut config = DashboardConfig::default_test();
    config.series.base_max = config.series.base_min;
    let cache = DatasetCache::new(config);
    assert!(cache.get().is_err());
    assert!(!cache.is_initialized());
}
