//! Immutable record snapshots

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use cp_models::{Project, ProjectId};

#[derive(Default)]
struct Records {
    list: Vec<Project>,
    /// Position of each id in `list`; the first occurrence wins
    index: HashMap<ProjectId, usize>,
}

/// Ordered, immutable view of every record at one point in time
///
/// Cloning is cheap; all clones share the same records. Lookup by id is
/// constant time.
#[derive(Clone, Default)]
pub struct Snapshot(Arc<Records>);

impl Snapshot {
    pub fn new(list: Vec<Project>) -> Self {
        let mut index = HashMap::with_capacity(list.len());
        for (position, project) in list.iter().enumerate() {
            if let Some(id) = &project.id {
                index.entry(id.clone()).or_insert(position);
            }
        }
        Self(Arc::new(Records { list, index }))
    }

    /// Record with `id`, if present
    pub fn get(&self, id: &ProjectId) -> Option<&Project> {
        self.0.index.get(id).map(|&position| &self.0.list[position])
    }

    pub fn contains(&self, id: &ProjectId) -> bool {
        self.0.index.contains_key(id)
    }

    /// Ids in snapshot order
    pub fn ids(&self) -> Vec<ProjectId> {
        self.0.list.iter().filter_map(|project| project.id.clone()).collect()
    }

    /// Whether both handles point at the same snapshot
    pub fn same_as(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.0.list == other.0.list
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Snapshot").field(&self.0.list).finish()
    }
}

impl Deref for Snapshot {
    type Target = [Project];

    fn deref(&self) -> &[Project] {
        &self.0.list
    }
}

impl From<Vec<Project>> for Snapshot {
    fn from(records: Vec<Project>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<Project> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Project>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str) -> Project {
        Project {
            id: Some(ProjectId::new(id)),
            name: format!("Proyecto {id}"),
            ..Project::default()
        }
    }

    #[test]
    fn test_lookup_and_order() {
        let snapshot: Snapshot = vec![project("b"), project("a")].into();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.ids(), vec![ProjectId::new("b"), ProjectId::new("a")]);
        assert_eq!(snapshot.get(&ProjectId::new("a")).unwrap().name, "Proyecto a");
        assert!(!snapshot.contains(&ProjectId::new("z")));
    }

    #[test]
    fn test_clones_share_records() {
        let snapshot: Snapshot = vec![project("a")].into();
        let copy = snapshot.clone();
        assert!(copy.same_as(&snapshot));
        assert!(!Snapshot::default().same_as(&snapshot));
    }

    #[test]
    fn test_lookup_across_many_records() {
        let snapshot: Snapshot = (0..500).map(|n| project(&format!("p{n}"))).collect();

        assert_eq!(snapshot.get(&ProjectId::new("p0")).unwrap().name, "Proyecto p0");
        assert_eq!(snapshot.get(&ProjectId::new("p499")).unwrap().name, "Proyecto p499");
        assert!(snapshot.get(&ProjectId::new("p500")).is_none());
        assert_eq!(snapshot.ids().len(), 500);
    }

    #[test]
    fn test_unsaved_and_duplicate_ids() {
        let mut first = project("a");
        first.name = "Primero".to_string();
        let unsaved = Project {
            id: None,
            ..project("x")
        };
        let snapshot: Snapshot = vec![first, unsaved, project("a")].into();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.get(&ProjectId::new("a")).unwrap().name, "Primero");
        assert_eq!(snapshot.ids(), vec![ProjectId::new("a"), ProjectId::new("a")]);
    }

    #[test]
    fn test_equality_compares_records() {
        let left: Snapshot = vec![project("a")].into();
        let right: Snapshot = vec![project("a")].into();
        assert_eq!(left, right);
        assert!(!left.same_as(&right));
        assert_ne!(left, Snapshot::default());
    }
}
