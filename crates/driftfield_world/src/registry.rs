//! # Record Registry
//!
//! `WorldData` owns every record in the universe and keeps two secondary
//! indices (by sector, by kind) in lockstep with the canonical map.
//!
//! ## Design
//!
//! ```text
//! records:   HashMap<RecordId, EntityRecord>          canonical
//! by_sector: HashMap<SectorCoord, BTreeSet<RecordId>> derived
//! by_kind:   HashMap<EntityKind, BTreeSet<RecordId>>  derived
//! ```
//!
//! Index sets are ordered, so partition queries come back in ascending id
//! order and stay deterministic across runs. Empty index sets are removed.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use driftfield_shared::{EntityKind, EntityRecord, RecordId, SectorCoord};

use crate::error::{WorldError, WorldResult};

/// Canonical record store with sector and kind indices.
#[derive(Debug, Clone)]
pub struct WorldData {
    records: HashMap<RecordId, EntityRecord>,
    by_sector: HashMap<SectorCoord, BTreeSet<RecordId>>,
    by_kind: HashMap<EntityKind, BTreeSet<RecordId>>,
    /// Strictly greater than every id ever registered.
    next_id: u64,
    /// Stamped into `created_at` of newly issued records.
    tick: u64,
}

impl Default for WorldData {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldData {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            by_sector: HashMap::new(),
            by_kind: HashMap::new(),
            next_id: 1,
            tick: 0,
        }
    }

    /// Sets the tick stamped into newly issued records.
    pub fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    /// The id the next unassigned record will receive.
    #[must_use]
    pub fn next_id(&self) -> RecordId {
        RecordId::new(self.next_id)
    }

    /// Moves the id counter to at least `raw`.
    pub(crate) fn reserve_ids_below(&mut self, raw: u64) {
        self.next_id = self.next_id.max(raw);
    }

    /// Registers a record and returns its id.
    ///
    /// A `NULL` id is replaced by a fresh one. A pre-assigned id is kept and
    /// the id counter moves past it.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::DuplicateId` if the id is already registered and
    /// `WorldError::IdSpaceExhausted` if the counter cannot move past it
    /// (`u64::MAX` is never issued). Nothing is modified in either case.
    pub fn register(&mut self, mut record: EntityRecord) -> WorldResult<RecordId> {
        let id = if record.id.is_null() {
            RecordId::new(self.next_id)
        } else {
            record.id
        };
        if self.records.contains_key(&id) {
            return Err(WorldError::DuplicateId(id));
        }
        let next_id = id.value().checked_add(1).ok_or(WorldError::IdSpaceExhausted)?;

        if record.id.is_null() {
            record.created_at = self.tick;
        }
        record.id = id;
        self.next_id = self.next_id.max(next_id);

        insert_index(&mut self.by_sector, record.sector, id);
        insert_index(&mut self.by_kind, record.kind(), id);
        self.records.insert(id, record);

        tracing::trace!(%id, "record registered");
        Ok(id)
    }

    /// Registers records in order, linking asteroids to their field.
    ///
    /// An asteroid with a `field_seed` and no `parent_field_id` is linked to
    /// the field with that seed registered earlier in the same call, or to
    /// one already registered in the same sector.
    ///
    /// # Errors
    ///
    /// Stops at the first failing `register`; records before it stay
    /// registered.
    pub fn register_all(
        &mut self,
        records: impl IntoIterator<Item = EntityRecord>,
    ) -> WorldResult<Vec<RecordId>> {
        let mut fields: HashMap<(SectorCoord, i64), RecordId> = HashMap::new();
        let mut ids = Vec::new();

        for mut record in records {
            let sector = record.sector;
            if let Some(asteroid) = record.as_asteroid_mut() {
                if asteroid.parent_field_id.is_none() {
                    if let Some(field_seed) = asteroid.field_seed {
                        asteroid.parent_field_id = fields
                            .get(&(sector, field_seed))
                            .copied()
                            .or_else(|| self.find_field(sector, field_seed));
                    }
                }
            }

            let field_key = record.as_field().map(|_| (sector, record.seed));
            let id = self.register(record)?;
            if let Some(key) = field_key {
                fields.insert(key, id);
            }
            ids.push(id);
        }

        Ok(ids)
    }

    fn find_field(&self, sector: SectorCoord, seed: i64) -> Option<RecordId> {
        self.query_by_sector(sector)
            .find(|r| r.kind() == EntityKind::AsteroidField && r.seed == seed)
            .map(|r| r.id)
    }

    /// Removes a record from the canonical map and every index.
    ///
    /// Returns `None` if the id is not registered.
    pub fn unregister(&mut self, id: RecordId) -> Option<EntityRecord> {
        let record = self.records.remove(&id)?;
        remove_index(&mut self.by_sector, record.sector, id);
        remove_index(&mut self.by_kind, record.kind(), id);
        tracing::trace!(%id, "record unregistered");
        Some(record)
    }

    /// Returns a record by id.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&EntityRecord> {
        self.records.get(&id)
    }

    /// Checks if a record is registered.
    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    /// Mutates a record in place and re-indexes it.
    ///
    /// The record keeps its id even if `f` changes it. Returns `None` if the
    /// id is not registered.
    pub fn modify<R>(&mut self, id: RecordId, f: impl FnOnce(&mut EntityRecord) -> R) -> Option<R> {
        let record = self.records.get_mut(&id)?;
        let (old_sector, old_kind) = (record.sector, record.kind());

        let out = f(record);
        record.id = id;
        let (new_sector, new_kind) = (record.sector, record.kind());

        if old_sector != new_sector {
            remove_index(&mut self.by_sector, old_sector, id);
            insert_index(&mut self.by_sector, new_sector, id);
        }
        if old_kind != new_kind {
            remove_index(&mut self.by_kind, old_kind, id);
            insert_index(&mut self.by_kind, new_kind, id);
        }

        Some(out)
    }

    /// Records in a sector, ascending by id.
    pub fn query_by_sector(&self, coord: SectorCoord) -> impl Iterator<Item = &EntityRecord> + '_ {
        self.by_sector
            .get(&coord)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.records.get(id))
    }

    /// Records of a kind, ascending by id.
    pub fn query_by_kind(&self, kind: EntityKind) -> impl Iterator<Item = &EntityRecord> + '_ {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.records.get(id))
    }

    /// Ids in a sector, ascending. Detached from the registry borrow.
    #[must_use]
    pub fn ids_in_sector(&self, coord: SectorCoord) -> Vec<RecordId> {
        self.by_sector
            .get(&coord)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Sectors holding at least one record.
    pub fn sectors(&self) -> impl Iterator<Item = SectorCoord> + '_ {
        self.by_sector.keys().copied()
    }

    /// All records, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityRecord> + '_ {
        self.records.values()
    }

    /// Number of registered records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Checks if no record is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes every record. The id counter is kept so ids are never reused.
    pub fn clear(&mut self) {
        self.records.clear();
        self.by_sector.clear();
        self.by_kind.clear();
    }

    /// Checks that canonical map and indices agree in both directions.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::IndexInconsistent` describing the first mismatch.
    pub fn verify_indices(&self) -> WorldResult<()> {
        for (id, record) in &self.records {
            if record.id != *id {
                return Err(inconsistent(format!("record stored under {id} carries {}", record.id)));
            }
            if !self.by_sector.get(&record.sector).is_some_and(|s| s.contains(id)) {
                return Err(inconsistent(format!("{id} missing from sector {}", record.sector)));
            }
            if !self.by_kind.get(&record.kind()).is_some_and(|s| s.contains(id)) {
                return Err(inconsistent(format!("{id} missing from kind {}", record.kind())));
            }
        }

        for (sector, ids) in &self.by_sector {
            for id in ids {
                match self.records.get(id) {
                    Some(record) if record.sector == *sector => {}
                    _ => return Err(inconsistent(format!("sector {sector} lists stale {id}"))),
                }
            }
        }

        for (kind, ids) in &self.by_kind {
            for id in ids {
                match self.records.get(id) {
                    Some(record) if record.kind() == *kind => {}
                    _ => return Err(inconsistent(format!("kind {kind} lists stale {id}"))),
                }
            }
        }

        Ok(())
    }
}

fn inconsistent(reason: String) -> WorldError {
    WorldError::IndexInconsistent { reason }
}

fn insert_index<K: Eq + Hash>(index: &mut HashMap<K, BTreeSet<RecordId>>, key: K, id: RecordId) {
    index.entry(key).or_default().insert(id);
}

fn remove_index<K: Eq + Hash>(index: &mut HashMap<K, BTreeSet<RecordId>>, key: K, id: RecordId) {
    if let Some(ids) = index.get_mut(&key) {
        ids.remove(&id);
        if ids.is_empty() {
            index.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftfield_shared::{AsteroidData, AsteroidFieldData, RecordBody, SizeClass, Vec2};

    fn asteroid(seed: i64, sector: SectorCoord) -> EntityRecord {
        EntityRecord::new(seed, sector, Vec2::ZERO, RecordBody::Asteroid(AsteroidData::new(SizeClass::Medium)))
    }

    fn field(seed: i64, sector: SectorCoord) -> EntityRecord {
        EntityRecord::new(
            seed,
            sector,
            Vec2::ZERO,
            RecordBody::AsteroidField(AsteroidFieldData {
                radius: 200.0,
                asteroid_count: 2,
                density: 0.5,
            }),
        )
    }

    #[test]
    fn test_register_issues_unique_ids() {
        let mut world = WorldData::new();
        let origin = SectorCoord::new(0, 0);

        let a = world.register(asteroid(1, origin)).unwrap();
        let b = world.register(asteroid(2, origin)).unwrap();
        world.unregister(a);
        let c = world.register(asteroid(3, origin)).unwrap();

        assert_ne!(a, b);
        assert_ne!(a, c, "ids must not be reused after unregister");
        assert_ne!(b, c);
        assert!(!a.is_null());
        world.verify_indices().unwrap();
    }

    #[test]
    fn test_preassigned_id_moves_counter() {
        let mut world = WorldData::new();
        let mut record = asteroid(1, SectorCoord::new(0, 0));
        record.id = RecordId::new(50);

        assert_eq!(world.register(record).unwrap(), RecordId::new(50));
        let next = world.register(asteroid(2, SectorCoord::new(0, 0))).unwrap();
        assert_eq!(next, RecordId::new(51));
    }

    #[test]
    fn test_max_id_is_never_issued() {
        let mut world = WorldData::new();
        let mut top = asteroid(1, SectorCoord::new(0, 0));
        top.id = RecordId::new(u64::MAX);

        assert!(matches!(world.register(top), Err(WorldError::IdSpaceExhausted)));
        assert!(world.is_empty());
        assert_eq!(world.next_id(), RecordId::new(1));
        world.verify_indices().unwrap();
    }

    #[test]
    fn test_exhausted_counter_rejects_without_mutation() {
        let mut world = WorldData::new();
        let mut last = asteroid(1, SectorCoord::new(0, 0));
        last.id = RecordId::new(u64::MAX - 1);
        world.register(last).unwrap();

        let a = world.register(asteroid(2, SectorCoord::new(5, 5)));
        let b = world.register(asteroid(3, SectorCoord::new(6, 6)));
        assert!(matches!(a, Err(WorldError::IdSpaceExhausted)));
        assert!(matches!(b, Err(WorldError::IdSpaceExhausted)));

        assert_eq!(world.len(), 1);
        assert_eq!(world.get(RecordId::new(u64::MAX - 1)).unwrap().seed, 1);
        assert_eq!(world.query_by_sector(SectorCoord::new(5, 5)).count(), 0);
        world.verify_indices().unwrap();
    }

    #[test]
    fn test_duplicate_id_rejected_without_mutation() {
        let mut world = WorldData::new();
        let id = world.register(asteroid(1, SectorCoord::new(0, 0))).unwrap();

        let mut clash = asteroid(99, SectorCoord::new(5, 5));
        clash.id = id;
        assert!(matches!(world.register(clash), Err(WorldError::DuplicateId(dup)) if dup == id));

        assert_eq!(world.len(), 1);
        assert_eq!(world.get(id).unwrap().seed, 1);
        assert_eq!(world.query_by_sector(SectorCoord::new(5, 5)).count(), 0);
        world.verify_indices().unwrap();
    }

    #[test]
    fn test_unregister_purges_indices() {
        let mut world = WorldData::new();
        let sector = SectorCoord::new(2, -1);
        let id = world.register(asteroid(1, sector)).unwrap();

        let removed = world.unregister(id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(world.query_by_sector(sector).count(), 0);
        assert_eq!(world.query_by_kind(EntityKind::Asteroid).count(), 0);
        assert_eq!(world.sectors().count(), 0);
        assert!(world.unregister(id).is_none());
        world.verify_indices().unwrap();
    }

    #[test]
    fn test_queries_are_partitioned_and_ordered() {
        let mut world = WorldData::new();
        let a = SectorCoord::new(0, 0);
        let b = SectorCoord::new(1, 0);

        let ids: Vec<_> = (0..5)
            .map(|i| world.register(asteroid(i, if i % 2 == 0 { a } else { b })).unwrap())
            .collect();
        world.register(field(100, a)).unwrap();

        let in_a: Vec<_> = world.query_by_sector(a).map(|r| r.id).collect();
        assert_eq!(in_a.len(), 4);
        assert!(in_a.windows(2).all(|w| w[0] < w[1]));

        let asteroids: Vec<_> = world.query_by_kind(EntityKind::Asteroid).map(|r| r.id).collect();
        assert_eq!(asteroids, ids);
        assert_eq!(world.query_by_kind(EntityKind::Station).count(), 0);
    }

    #[test]
    fn test_modify_reindexes_and_keeps_id() {
        let mut world = WorldData::new();
        let from = SectorCoord::new(0, 0);
        let to = SectorCoord::new(-3, 4);
        let id = world.register(asteroid(1, from)).unwrap();

        world
            .modify(id, |record| {
                record.sector = to;
                record.id = RecordId::new(999);
            })
            .unwrap();

        assert_eq!(world.get(id).unwrap().sector, to);
        assert_eq!(world.ids_in_sector(to), vec![id]);
        assert!(world.ids_in_sector(from).is_empty());
        assert!(world.modify(RecordId::new(12345), |_| ()).is_none());
        world.verify_indices().unwrap();
    }

    #[test]
    fn test_register_all_links_asteroids_to_field() {
        let mut world = WorldData::new();
        let sector = SectorCoord::new(1, 1);

        let mut member = asteroid(7, sector);
        member.as_asteroid_mut().unwrap().field_seed = Some(42);

        let ids = world.register_all(vec![field(42, sector), member]).unwrap();
        let linked = world.get(ids[1]).unwrap().as_asteroid().unwrap();
        assert_eq!(linked.parent_field_id, Some(ids[0]));

        // A later batch in the same sector still finds the field.
        let mut late = asteroid(8, sector);
        late.as_asteroid_mut().unwrap().field_seed = Some(42);
        let late_id = world.register_all(vec![late]).unwrap()[0];
        assert_eq!(world.get(late_id).unwrap().as_asteroid().unwrap().parent_field_id, Some(ids[0]));
    }

    #[test]
    fn test_created_at_stamped_from_tick() {
        let mut world = WorldData::new();
        world.set_tick(17);
        let id = world.register(asteroid(1, SectorCoord::new(0, 0))).unwrap();
        assert_eq!(world.get(id).unwrap().created_at, 17);
    }

    #[test]
    fn test_clear_keeps_counter() {
        let mut world = WorldData::new();
        let first = world.register(asteroid(1, SectorCoord::new(0, 0))).unwrap();
        world.clear();
        assert!(world.is_empty());
        let second = world.register(asteroid(1, SectorCoord::new(0, 0))).unwrap();
        assert!(second > first);
    }
}
