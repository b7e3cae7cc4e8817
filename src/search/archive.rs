//! Pareto dominance and the non-dominated archive.

use serde::{Deserialize, Serialize};

/// Objective vector of a route; every component is minimized
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Objectives {
    pub time: f64,
    pub cost: f64,
    pub transfers: f64,
}

impl Objectives {
    pub fn new(time: f64, cost: f64, transfers: f64) -> Self {
        Objectives { time, cost, transfers }
    }

    /// The same value on every objective
    pub fn uniform(value: f64) -> Self {
        Objectives { time: value, cost: value, transfers: value }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.time, self.cost, self.transfers]
    }

    /// `self` is no worse on every objective and strictly better on one
    pub fn dominates(&self, other: &Objectives) -> bool {
        let a = self.as_array();
        let b = other.as_array();
        a.iter().zip(b.iter()).all(|(x, y)| x <= y) && a.iter().zip(b.iter()).any(|(x, y)| x < y)
    }
}

/// Unbounded set of mutually non-dominated solutions.
///
/// An insert is rejected if an existing member dominates the candidate or is
/// the same solution; otherwise every member the candidate dominates is
/// evicted.
#[derive(Debug, Clone)]
pub struct ParetoArchive<T> {
    members: Vec<(Objectives, T)>,
}

impl<T> Default for ParetoArchive<T> {
    fn default() -> Self {
        ParetoArchive { members: Vec::new() }
    }
}

impl<T: PartialEq + Clone> ParetoArchive<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to admit a solution; returns whether it was added
    pub fn insert(&mut self, objectives: Objectives, item: &T) -> bool {
        let rejected = self
            .members
            .iter()
            .any(|(o, existing)| o.dominates(&objectives) || existing == item);
        if rejected {
            return false;
        }

        self.members.retain(|(o, _)| !objectives.dominates(o));
        self.members.push((objectives, item.clone()));
        true
    }

    /// Offer every solution of a batch; returns how many were admitted
    pub fn update<'a, I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = (Objectives, &'a T)>,
        T: 'a,
    {
        batch.into_iter().filter(|(o, item)| self.insert(*o, item)).count()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Objectives, T)> {
        self.members.iter()
    }

    pub fn into_members(self) -> Vec<(Objectives, T)> {
        self.members
    }
}
