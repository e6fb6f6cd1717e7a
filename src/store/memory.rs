//! Thread-safe in-memory [`SlotStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{SlotStore, StoreError, StoreFuture},
};

type SlotMap = Arc<RwLock<HashMap<String, String>>>;

/// Thread-safe storage backend that keeps slots in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(SlotMap);
impl MemoryStore {
	fn get_now(map: SlotMap, slot: String) -> Option<String> {
		map.read().get(&slot).cloned()
	}

	fn set_now(map: SlotMap, slot: String, value: String) -> Result<(), StoreError> {
		map.write().insert(slot, value);

		Ok(())
	}

	fn remove_now(map: SlotMap, slot: String) -> Option<String> {
		map.write().remove(&slot)
	}
}
impl SlotStore for MemoryStore {
	fn get<'a>(&'a self, slot: &'a str) -> StoreFuture<'a, Option<String>> {
		let map = self.0.clone();
		let slot = slot.to_owned();

		Box::pin(async move { Ok(Self::get_now(map, slot)) })
	}

	fn set<'a>(&'a self, slot: &'a str, value: &'a str) -> StoreFuture<'a, ()> {
		let map = self.0.clone();
		let slot = slot.to_owned();
		let value = value.to_owned();

		Box::pin(async move { Self::set_now(map, slot, value) })
	}

	fn remove<'a>(&'a self, slot: &'a str) -> StoreFuture<'a, Option<String>> {
		let map = self.0.clone();
		let slot = slot.to_owned();

		Box::pin(async move { Ok(Self::remove_now(map, slot)) })
	}
}
