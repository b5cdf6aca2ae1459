//! One jar per owner.
//!
//! The shelf keeps a `Simulation` per owner in sync with an ownership
//! snapshot. Marbles an owner already had appear settled; marbles gained
//! since the last snapshot are queued and dropped in one at a time, spaced
//! `drop_interval` ticks apart.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::simulation::engine::Simulation;
use crate::simulation::error::EngineResult;
use crate::simulation::geometry::JarGeometry;
use crate::simulation::params::Parameters;
use crate::simulation::states::BodyId;

use super::changes::{detect_changes, OwnershipChanges, OwnershipCounts};

#[derive(Debug, Clone)]
pub struct OwnerJar {
    sim: Simulation,
    pending: u32,  // queued drops
    cooldown: u32, // ticks until the next drop may happen
}

impl OwnerJar {
    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// Marbles in the jar plus those still queued.
    pub fn target(&self) -> usize {
        self.sim.len() + self.pending as usize
    }
}

#[derive(Debug, Clone)]
pub struct JarShelf {
    jar: JarGeometry,
    params: Parameters,
    drop_interval: u32,
    current_user: Option<String>,
    counts: OwnershipCounts,
    jars: BTreeMap<String, OwnerJar>,
}

impl JarShelf {
    pub fn new(jar: JarGeometry, params: Parameters, drop_interval: u32) -> EngineResult<Self> {
        params.validate()?;
        Ok(Self {
            jar,
            params,
            drop_interval,
            current_user: None,
            counts: OwnershipCounts::new(),
            jars: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn with_current_user(mut self, user: impl Into<String>) -> Self {
        self.current_user = Some(user.into());
        self
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn counts(&self) -> &OwnershipCounts {
        &self.counts
    }

    pub fn jar(&self, owner: &str) -> Option<&OwnerJar> {
        self.jars.get(owner)
    }

    pub fn jars(&self) -> impl Iterator<Item = (&str, &OwnerJar)> {
        self.jars.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.jars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jars.is_empty()
    }

    /// Take `counts` as the baseline: every marble appears settled.
    pub fn load(&mut self, counts: &OwnershipCounts) -> EngineResult<()> {
        self.apply(counts, &OwnershipChanges::default())?;
        info!(jars = self.jars.len(), "shelf loaded");
        Ok(())
    }

    /// Move to a new snapshot. Gains are dropped in, losses removed from
    /// the top, owners that disappeared lose their jar.
    pub fn sync(&mut self, counts: &OwnershipCounts) -> EngineResult<OwnershipChanges> {
        let changes = detect_changes(&self.counts, counts, self.current_user.as_deref());
        self.apply(counts, &changes)?;
        info!(
            jars = self.jars.len(),
            user_got_marble = changes.user_got_marble,
            "shelf synced"
        );
        Ok(changes)
    }

    fn apply(&mut self, counts: &OwnershipCounts, changes: &OwnershipChanges) -> EngineResult<()> {
        self.jars.retain(|owner, _| counts.contains_key(owner));

        for (owner, &count) in counts {
            match self.jars.get_mut(owner) {
                Some(jar) => resize(jar, count as usize),
                None => {
                    let added = changes.added_for(owner).min(count);
                    let jar = self.new_jar(owner, count - added, added)?;
                    self.jars.insert(owner.clone(), jar);
                }
            }
        }

        self.counts = counts.clone();
        Ok(())
    }

    fn new_jar(&self, owner: &str, settled: u32, pending: u32) -> EngineResult<OwnerJar> {
        let mut params = self.params.clone();
        params.seed = owner_seed(self.params.seed, owner);

        let mut sim = Simulation::new(self.jar, params)?;
        sim.fill_settled(settled as usize)?;
        sim.start();
        debug!(owner, settled, pending, "jar created");

        Ok(OwnerJar {
            sim,
            pending,
            cooldown: 0,
        })
    }

    /// Advance every jar by one tick, releasing queued drops as they come due.
    pub fn tick(&mut self) -> EngineResult<()> {
        for jar in self.jars.values_mut() {
            if jar.pending > 0 {
                if jar.cooldown == 0 {
                    jar.sim.drop_marble()?;
                    jar.pending -= 1;
                    jar.cooldown = self.drop_interval;
                } else {
                    jar.cooldown -= 1;
                }
            }
            jar.sim.tick();
        }
        Ok(())
    }

    /// Drop a marble into `owner`'s jar right away.
    pub fn drop_now(&mut self, owner: &str) -> EngineResult<Option<BodyId>> {
        match self.jars.get_mut(owner) {
            Some(jar) => jar.sim.drop_marble().map(Some),
            None => Ok(None),
        }
    }

    /// Remove the newest marble from `owner`'s jar. `None` if there is no
    /// such jar, otherwise the remaining count.
    pub fn undo(&mut self, owner: &str) -> Option<usize> {
        self.jars.get_mut(owner).map(|jar| jar.sim.undo_last())
    }

    pub fn start(&mut self) {
        self.jars.values_mut().for_each(|j| j.sim.start());
    }

    pub fn stop(&mut self) {
        self.jars.values_mut().for_each(|j| j.sim.stop());
    }

    pub fn is_running(&self) -> bool {
        self.jars.values().any(|j| j.sim.is_running())
    }
}

/// Bring an existing jar to `count` marbles: grow the queue, or shrink the
/// queue first and then take marbles off the top.
fn resize(jar: &mut OwnerJar, count: usize) {
    let target = jar.target();
    if count > target {
        jar.pending += (count - target) as u32;
        return;
    }

    let mut excess = target - count;
    let from_queue = excess.min(jar.pending as usize);
    jar.pending -= from_queue as u32;
    excess -= from_queue;
    for _ in 0..excess {
        jar.sim.undo_last();
    }
}

/// Per-owner seed so jars do not mirror each other.
fn owner_seed(seed: u64, owner: &str) -> u64 {
    owner
        .bytes()
        .fold(seed, |h, b| h.wrapping_mul(31).wrapping_add(u64::from(b)))
}
