//! Worker allocation against a shrinking pool of available labor.
//!
//! Each tick the orchestrator builds one [`WorkerPool`] from the workers
//! segment. Industries draw from its front in region order, so earlier
//! industries get first pick and no worker is allocated twice.

use std::collections::VecDeque;

use mercat_types::{Industry, PersonId};

/// Select workers for an industry from the front of `pool`.
///
/// Returns at most `min(industry.labor_needed, pool.len())` IDs, in pool
/// order. The pool itself is not modified; see [`WorkerPool::take_for`].
pub fn allocate_workers(industry: &Industry, pool: &[PersonId]) -> Vec<PersonId> {
    let wanted = usize::try_from(industry.labor_needed).unwrap_or(usize::MAX);
    pool.iter().take(wanted).copied().collect()
}

/// The workers still unassigned in the current tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Unassigned workers, in region order.
    available: VecDeque<PersonId>,
}

impl WorkerPool {
    /// Build a pool from the given workers.
    pub fn new(workers: impl IntoIterator<Item = PersonId>) -> Self {
        Self {
            available: workers.into_iter().collect(),
        }
    }

    /// Allocate workers to `industry` and remove them from the pool.
    ///
    /// Removal is unconditional: a worker allocated to an industry that
    /// later fails to pay or produce is not returned to the pool.
    pub fn take_for(&mut self, industry: &Industry) -> Vec<PersonId> {
        let allocated = allocate_workers(industry, self.available.make_contiguous());
        self.available.drain(..allocated.len());
        allocated
    }

    /// Number of workers still unassigned.
    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    /// Whether every worker has been assigned.
    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use mercat_types::{IndustryId, NewIndustry};
    use rust_decimal::Decimal;

    use super::*;

    fn industry(labor_needed: u32) -> Industry {
        Industry::new(
            IndustryId(1),
            NewIndustry {
                name: "Agriculture".to_owned(),
                labor_needed,
                initial_capital: Decimal::ZERO,
                solved_problems: Vec::new(),
                inputs: Vec::new(),
                outputs: Vec::new(),
            },
        )
    }

    fn people(n: u64) -> Vec<PersonId> {
        (1..=n).map(PersonId).collect()
    }

    #[test]
    fn allocation_is_capped_by_need() {
        let pool = people(10);
        let allocated = allocate_workers(&industry(4), &pool);
        assert_eq!(allocated, people(4));
    }

    #[test]
    fn allocation_is_capped_by_pool() {
        let pool = people(3);
        let allocated = allocate_workers(&industry(10), &pool);
        assert_eq!(allocated.len(), 3);
    }

    #[test]
    fn zero_need_allocates_nobody() {
        assert!(allocate_workers(&industry(0), &people(5)).is_empty());
    }

    #[test]
    fn pool_shrinks_between_industries() {
        let mut pool = WorkerPool::new(people(6));
        let first = pool.take_for(&industry(4));
        let second = pool.take_for(&industry(4));

        assert_eq!(first, people(4));
        assert_eq!(second, vec![PersonId(5), PersonId(6)]);
        assert!(pool.is_empty());
        assert!(pool.take_for(&industry(1)).is_empty());
    }

    #[test]
    fn no_worker_is_allocated_twice() {
        let mut pool = WorkerPool::new(people(5));
        let mut seen: Vec<PersonId> = Vec::new();
        for need in [2, 0, 2, 3] {
            for worker in pool.take_for(&industry(need)) {
                assert!(!seen.contains(&worker));
                seen.push(worker);
            }
        }
        assert_eq!(seen.len(), 5);
        assert_eq!(pool.remaining(), 0);
    }
}
