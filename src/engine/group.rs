//! Folding child chains into their parent ecosystems.

use super::change::{mcap_to_tvl, period_changes};
use crate::domain::{AggregatedEntity, ChainEntity, ChainGroup, ChainKey, Decimal, PeriodTotals};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug)]
struct GroupAccumulator {
    parent: String,
    totals: PeriodTotals,
    extra_tvl: BTreeMap<String, Decimal>,
    protocols: u32,
    mcap: Option<Decimal>,
    rows: Vec<ChainEntity>,
}

impl GroupAccumulator {
    fn new(parent: &str) -> Self {
        Self {
            parent: parent.to_string(),
            totals: PeriodTotals::default(),
            extra_tvl: BTreeMap::new(),
            protocols: 0,
            mcap: None,
            rows: Vec::new(),
        }
    }

    fn absorb(&mut self, chain: &ChainEntity) {
        self.totals = self.totals.merged(&chain.figures.totals);
        for (category, value) in &chain.figures.extra_tvl {
            *self.extra_tvl.entry(category.clone()).or_default() += *value;
        }
        self.protocols += chain.protocols;
        if let Some(mcap) = chain.mcap {
            self.mcap = Some(self.mcap.unwrap_or_default() + mcap);
        }
        self.rows.push(chain.clone());
    }

    fn finish(mut self) -> ChainEntity {
        // A parent standing alone is not a group.
        if self.rows.len() == 1 && ChainKey::new(&self.rows[0].name) == ChainKey::new(&self.parent) {
            return self.rows.remove(0);
        }

        let changes = period_changes(&self.totals);
        let mcaptvl = mcap_to_tvl(self.mcap, self.totals.tvl);
        let mut members: Vec<String> = self.rows.iter().flat_map(|r| r.members.clone()).collect();
        members.sort();
        members.dedup();

        ChainEntity {
            name: self.parent,
            figures: AggregatedEntity {
                totals: self.totals,
                changes,
                extra_tvl: self.extra_tvl,
            },
            protocols: self.protocols,
            mcap: self.mcap,
            mcaptvl,
            members,
            sub_rows: self.rows,
        }
    }
}

enum Slot {
    Single(usize),
    Group(usize),
}

/// Fold chains into their declared parents.
///
/// When `active` is false the input slice is returned borrowed and untouched.
/// Otherwise each group row sums its members (the parent chain itself
/// included), recomputes percent changes from the summed totals and lists the
/// members as `sub_rows`; ungrouped chains pass through unchanged. A chain
/// declared under several parents joins the first one. Output is ordered by
/// TVL descending.
pub fn group_chains_by_parent<'a>(
    chains: &'a [ChainEntity],
    groups: &[ChainGroup],
    active: bool,
) -> Cow<'a, [ChainEntity]> {
    if !active {
        return Cow::Borrowed(chains);
    }

    let mut parent_of: HashMap<ChainKey, &str> = HashMap::new();
    for group in groups {
        parent_of
            .entry(ChainKey::new(&group.parent_name))
            .or_insert(group.parent_name.as_str());
        for child in &group.child_names {
            parent_of
                .entry(ChainKey::new(child))
                .or_insert(group.parent_name.as_str());
        }
    }

    let mut slots: Vec<Slot> = Vec::new();
    let mut accumulators: Vec<GroupAccumulator> = Vec::new();
    let mut group_index: HashMap<ChainKey, usize> = HashMap::new();

    for (idx, chain) in chains.iter().enumerate() {
        match parent_of.get(&ChainKey::new(&chain.name)) {
            Some(parent) => {
                let key = ChainKey::new(parent);
                let acc_idx = *group_index.entry(key).or_insert_with(|| {
                    accumulators.push(GroupAccumulator::new(parent));
                    slots.push(Slot::Group(accumulators.len() - 1));
                    accumulators.len() - 1
                });
                accumulators[acc_idx].absorb(chain);
            }
            None => slots.push(Slot::Single(idx)),
        }
    }

    let mut finished: Vec<Option<ChainEntity>> =
        accumulators.into_iter().map(|a| Some(a.finish())).collect();
    let mut grouped: Vec<ChainEntity> = slots
        .into_iter()
        .filter_map(|slot| match slot {
            Slot::Single(idx) => Some(chains[idx].clone()),
            Slot::Group(idx) => finished[idx].take(),
        })
        .collect();
    grouped.sort_by(|a, b| b.figures.tvl().cmp(&a.figures.tvl()));

    tracing::debug!(
        input = chains.len(),
        output = grouped.len(),
        "Grouped chains by parent"
    );

    Cow::Owned(grouped)
}
