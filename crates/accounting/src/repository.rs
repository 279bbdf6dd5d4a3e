//! Storage seam for ledger records.
//!
//! The stores only talk to a [`Repository`], so a persistent backend can
//! replace [`InMemoryRepository`] without touching balance bookkeeping.

use spendbook_core::Entity;

/// Insertion-ordered collection of entities keyed by their id.
///
/// Reads hand out owned copies, mirroring what a database-backed
/// implementation would return.
pub trait Repository<T>: Send
where
    T: Entity + Clone,
{
    fn insert(&mut self, record: T);
    fn get(&self, id: T::Id) -> Option<T>;
    /// Borrow every record in insertion order.
    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a;
    /// Apply `f` to the record in place and borrow the result.
    fn update<F>(&mut self, id: T::Id, f: F) -> Option<&T>
    where
        F: FnOnce(&mut T);
    fn remove(&mut self, id: T::Id) -> Option<T>;
    /// Remove every record, returning them in insertion order.
    fn clear(&mut self) -> Vec<T>;
    fn len(&self) -> usize;

    /// All records in insertion order.
    fn list(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `Vec`-backed repository for the in-process service and tests.
#[derive(Debug, Clone)]
pub struct InMemoryRepository<T> {
    records: Vec<T>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InMemoryRepository<T>
where
    T: Entity,
{
    fn position(&self, id: T::Id) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }
}

impl<T> Repository<T> for InMemoryRepository<T>
where
    T: Entity + Clone + Send,
{
    fn insert(&mut self, record: T) {
        match self.position(record.id()) {
            Some(idx) => self.records[idx] = record,
            None => self.records.push(record),
        }
    }

    fn get(&self, id: T::Id) -> Option<T> {
        self.records.iter().find(|r| r.id() == id).cloned()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.records.iter()
    }

    fn update<F>(&mut self, id: T::Id, f: F) -> Option<&T>
    where
        F: FnOnce(&mut T),
    {
        let idx = self.position(id)?;
        let record = &mut self.records[idx];
        f(record);
        Some(record)
    }

    fn remove(&mut self, id: T::Id) -> Option<T> {
        let idx = self.position(id)?;
        // `remove`, not `swap_remove`: listing order is creation order.
        Some(self.records.remove(idx))
    }

    fn clear(&mut self) -> Vec<T> {
        std::mem::take(&mut self.records)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: u32,
        text: &'static str,
    }

    impl Entity for Note {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }
    }

    fn note(id: u32, text: &'static str) -> Note {
        Note { id, text }
    }

    #[test]
    fn list_preserves_insertion_order_across_removals() {
        let mut repo = InMemoryRepository::new();
        repo.insert(note(1, "a"));
        repo.insert(note(2, "b"));
        repo.insert(note(3, "c"));

        assert_eq!(repo.remove(2), Some(note(2, "b")));
        let ids: Vec<u32> = repo.list().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn insert_with_existing_id_replaces_in_place() {
        let mut repo = InMemoryRepository::new();
        repo.insert(note(1, "a"));
        repo.insert(note(2, "b"));
        repo.insert(note(1, "z"));

        assert_eq!(repo.list(), vec![note(1, "z"), note(2, "b")]);
    }

    #[test]
    fn update_and_remove_report_missing_records() {
        let mut repo: InMemoryRepository<Note> = InMemoryRepository::new();
        assert!(repo.is_empty());
        assert_eq!(repo.update(9, |n| n.text = "x"), None);
        assert_eq!(repo.remove(9), None);

        repo.insert(note(9, "old"));
        assert_eq!(repo.update(9, |n| n.text = "new"), Some(&note(9, "new")));
        assert_eq!(repo.get(9), Some(note(9, "new")));
    }

    #[test]
    fn clear_empties_and_returns_records_in_order() {
        let mut repo = InMemoryRepository::new();
        repo.insert(note(1, "a"));
        repo.insert(note(2, "b"));

        assert_eq!(repo.clear(), vec![note(1, "a"), note(2, "b")]);
        assert!(repo.is_empty());
        assert_eq!(repo.iter().count(), 0);
        assert!(repo.clear().is_empty());
    }
}
