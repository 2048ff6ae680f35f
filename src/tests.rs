use std::collections::HashSet;

use futures::future::join_all;

use crate::{
	config::{open_backend, BackendKind, StorageConfig},
	storage::{
		common::{Page, Window, DEFAULT_PAGE_LIMIT},
		memory::MemoryBackend,
		StorageBackend,
	},
	types::StorageError,
};

#[tokio::test]
async fn minting_returns_distinct_identifiers() {
	let backend = MemoryBackend::new();

	let minted = backend.mint_containers(20).await.unwrap();
	assert_eq!(minted.len(), 20);
	assert_eq!(minted.iter().collect::<HashSet<_>>().len(), 20);

	let page = backend.list_containers(Window::new(0, 20)).await.unwrap();
	assert_eq!(page.total, 20);
	assert_eq!(
		page.items.iter().collect::<HashSet<_>>(),
		minted.iter().collect::<HashSet<_>>()
	);
}

#[tokio::test]
async fn removed_container_rejects_new_members() {
	let backend = MemoryBackend::new();

	let container_id = backend.mint_container().await.unwrap();
	backend.remove_container(&container_id).await.unwrap();

	assert!(!backend.container_exists(&container_id).await.unwrap());

	let err = backend.add_member(&container_id, "m").await.unwrap_err();
	assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn members_keep_insertion_order() {
	let backend = MemoryBackend::new();

	let container_id = backend.mint_container().await.unwrap();
	for member_id in ["a", "b", "c"] {
		backend.add_member(&container_id, member_id).await.unwrap();
	}

	let page = backend.list_members(&container_id, Window::new(0, 3)).await.unwrap();
	assert_eq!(page.items, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
}

#[tokio::test]
async fn removing_a_member_drops_first_occurrence_only() {
	let backend = MemoryBackend::new();

	let container_id = backend.mint_container().await.unwrap();
	for member_id in ["a", "a", "b"] {
		backend.add_member(&container_id, member_id).await.unwrap();
	}

	backend.remove_member(&container_id, "a").await.unwrap();

	let page = backend.list_members(&container_id, Window::new(0, 10)).await.unwrap();
	assert_eq!(page.items, vec!["a".to_string(), "b".to_string()]);
	assert_eq!(page.total, 2);
}

#[tokio::test]
async fn pages_tile_the_full_collection() {
	let backend = MemoryBackend::new();

	let minted = backend.mint_containers(1234).await.unwrap();

	let mut seen = Vec::new();
	let mut offset = Some(0);
	while let Some(current) = offset {
		let page = backend.list_containers(Window::new(current, 200)).await.unwrap();
		assert_eq!(page.total, 1234);
		seen.extend(page.items.clone());
		offset = page.next_offset();
	}

	assert_eq!(seen.len(), 1234);
	assert_eq!(seen.iter().collect::<HashSet<_>>(), minted.iter().collect::<HashSet<_>>());

	// The windows were cut from one stable total ordering.
	let mut sorted = seen.clone();
	sorted.sort();
	assert_eq!(seen, sorted);
}

#[tokio::test]
async fn limit_above_the_maximum_is_capped_silently() {
	let backend = MemoryBackend::new();
	backend.mint_containers(5).await.unwrap();

	let page = backend.list_containers(Window::new(0, 1001)).await.unwrap();
	assert_eq!(page.limit, DEFAULT_PAGE_LIMIT);
	assert_eq!(page.items.len(), 5);

	let page = backend.list_containers(Window::with_max(0, 4, 3)).await.unwrap();
	assert_eq!(page.limit, 3);
	assert_eq!(page.items.len(), 3);
	assert_eq!(page.total, 5);
}

#[tokio::test]
async fn degenerate_windows_yield_empty_pages() {
	let backend = MemoryBackend::new();
	backend.mint_containers(3).await.unwrap();

	let page = backend.list_containers(Window::new(0, 0)).await.unwrap();
	assert!(page.items.is_empty());
	assert_eq!(page.total, 3);
	assert_eq!(page.next_offset(), None);

	let page = backend.list_containers(Window::new(10, 5)).await.unwrap();
	assert!(page.items.is_empty());
	assert_eq!(page.total, 3);
}

#[tokio::test]
async fn removing_absent_targets_succeeds() {
	let backend = MemoryBackend::new();

	backend.remove_container("no-such-container").await.unwrap();
	backend.remove_member("no-such-container", "no-such-member").await.unwrap();

	let container_id = backend.mint_container().await.unwrap();
	backend.remove_member(&container_id, "no-such-member").await.unwrap();
}

#[tokio::test]
async fn member_listing_round_trip() {
	let backend = MemoryBackend::new();

	let container_id = backend.mint_container().await.unwrap();
	backend.add_member(&container_id, "m1").await.unwrap();
	backend.add_member(&container_id, "m2").await.unwrap();

	let page = backend.list_members(&container_id, Window::new(0, 10)).await.unwrap();
	assert_eq!(page.total, 2);
	assert_eq!(page.items, vec!["m1".to_string(), "m2".to_string()]);

	backend.remove_member(&container_id, "m1").await.unwrap();

	let page = backend.list_members(&container_id, Window::new(0, 10)).await.unwrap();
	assert_eq!(page.total, 1);
	assert_eq!(page.items, vec!["m2".to_string()]);
}

#[tokio::test]
async fn empty_container_is_distinct_from_a_missing_one() {
	let backend = MemoryBackend::new();

	let container_id = backend.mint_container().await.unwrap();
	assert!(backend.container_exists(&container_id).await.unwrap());

	let page = backend.list_members(&container_id, Window::default()).await.unwrap();
	assert!(page.items.is_empty());
	assert_eq!(page.total, 0);

	let err = backend.list_members("no-such-container", Window::default()).await.unwrap_err();
	assert!(err.is_not_found());
}

#[tokio::test]
async fn member_existence_requires_the_container() {
	let backend = MemoryBackend::new();

	let err = backend.member_exists("no-such-container", "m").await.unwrap_err();
	assert!(err.is_not_found());

	let container_id = backend.mint_container().await.unwrap();
	assert!(!backend.member_exists(&container_id, "m").await.unwrap());

	backend.add_member(&container_id, "m").await.unwrap();
	assert!(backend.member_exists(&container_id, "m").await.unwrap());
}

#[tokio::test]
async fn batch_operations_preserve_input_order() {
	let backend = MemoryBackend::new();

	let container_id = backend.mint_container().await.unwrap();
	let member_ids = vec!["x".to_string(), "y".to_string(), "z".to_string()];

	let added = backend.add_members(&container_id, &member_ids).await.unwrap();
	assert_eq!(added, member_ids);

	let page = backend.list_members(&container_id, Window::new(0, 10)).await.unwrap();
	assert_eq!(page.items, member_ids);

	backend.remove_members(&container_id, &member_ids[..2]).await.unwrap();
	let page = backend.list_members(&container_id, Window::new(0, 10)).await.unwrap();
	assert_eq!(page.items, vec!["z".to_string()]);
}

#[tokio::test]
async fn batch_add_surfaces_the_first_failure() {
	let backend = MemoryBackend::new();

	let member_ids = vec!["x".to_string(), "y".to_string()];
	let err = backend.add_members("no-such-container", &member_ids).await.unwrap_err();
	assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn batch_remove_containers_is_idempotent() {
	let backend = MemoryBackend::new();

	let mut minted = backend.mint_containers(3).await.unwrap();
	minted.push("no-such-container".to_string());

	backend.remove_containers(&minted).await.unwrap();

	let page = backend.list_containers(Window::default()).await.unwrap();
	assert_eq!(page.total, 0);
}

#[tokio::test]
async fn concurrent_mints_yield_distinct_identifiers() {
	let backend = MemoryBackend::new();

	let minted = join_all((0..64).map(|_| backend.mint_container())).await;
	let minted = minted.into_iter().collect::<Result<Vec<_>, _>>().unwrap();

	assert_eq!(minted.iter().collect::<HashSet<_>>().len(), 64);

	let page = backend.list_containers(Window::new(0, 100)).await.unwrap();
	assert_eq!(page.total, 64);
}

#[test]
fn window_slice_stays_in_range() {
	let full = vec![1, 2, 3, 4, 5];

	assert_eq!(Window::new(0, 2).slice(&full), &[1, 2]);
	assert_eq!(Window::new(3, 10).slice(&full), &[4, 5]);
	assert_eq!(Window::new(5, 1).slice(&full), &[] as &[i32]);
	assert_eq!(Window::new(2, 0).slice(&full), &[] as &[i32]);
	assert_eq!(Window::new(usize::MAX, 1).slice(&full), &[] as &[i32]);
}

#[test]
fn window_default_matches_the_policy_defaults() {
	let window = Window::default();
	assert_eq!(window.offset(), 0);
	assert_eq!(window.limit(), DEFAULT_PAGE_LIMIT);
}

#[test]
fn page_next_offset_terminates() {
	let window = Window::new(0, 2);
	let page = Page::new(vec!["a".to_string(), "b".to_string()], window, 5);
	assert_eq!(page.next_offset(), Some(2));

	let window = Window::new(4, 2);
	let page = Page::new(vec!["e".to_string()], window, 5);
	assert_eq!(page.next_offset(), None);

	// A zero-limit page must not loop forever.
	let window = Window::new(0, 0);
	let page = Page::new(Vec::new(), window, 5);
	assert_eq!(page.next_offset(), None);
}

#[test]
fn backend_selector_parsing() {
	assert_eq!(BackendKind::parse("ram").unwrap(), BackendKind::Ram);
	assert_eq!(BackendKind::parse("RAM").unwrap(), BackendKind::Ram);

	let err = BackendKind::parse("cassandra").unwrap_err();
	assert!(matches!(err, StorageError::Misconfigured(_)));
}

#[tokio::test]
async fn default_config_opens_the_in_memory_backend() {
	let backend = open_backend(&StorageConfig::default()).await.unwrap();

	let container_id = backend.mint_container().await.unwrap();
	assert!(backend.container_exists(&container_id).await.unwrap());
}
