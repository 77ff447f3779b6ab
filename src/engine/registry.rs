//! Id allocation and the id to task map.
//!
//! The registry is only ever touched through the engine's lock, so a
//! duplicate scan, an id allocation and the matching insert happen as one
//! step.

use crate::task::{Task, TaskId};

use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug)]
pub(crate) struct Registry {
    next_id: TaskId,
    tasks: BTreeMap<TaskId, Arc<Task>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            next_id: 1,
            tasks: BTreeMap::new(),
        }
    }
}

impl Registry {
    /// A fresh id, strictly greater than every id handed out before.
    pub(crate) fn allocate_id(&mut self) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn insert(&mut self, task: Arc<Task>) {
        self.tasks.insert(task.id(), task);
    }

    pub(crate) fn get(&self, id: TaskId) -> Option<&Arc<Task>> {
        self.tasks.get(&id)
    }

    pub(crate) fn remove(&mut self, id: TaskId) -> Option<Arc<Task>> {
        self.tasks.remove(&id)
    }

    /// Registered tasks bound to `url`, oldest first.
    pub(crate) fn for_url<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a Arc<Task>> + 'a {
        self.tasks.values().filter(move |task| task.url() == url)
    }

    pub(crate) fn ids(&self) -> Vec<TaskId> {
        self.tasks.keys().copied().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }
}
