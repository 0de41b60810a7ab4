//! Scope sets

use std::collections::BTreeSet;

/// The set of entity ids an actor may see for one entity type.
///
/// The three states are distinct on purpose: `Empty` means "computed,
/// no access" and must never collapse into `Unrestricted` ("no filter
/// applied"). `Restricted` always holds at least one id; the constructor
/// normalizes an empty id list to `Empty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeSet {
    Unrestricted,
    Empty,
    Restricted(BTreeSet<i64>),
}

impl ScopeSet {
    /// 从 id 列表构造范围，空列表归一化为 `Empty`
    pub fn restricted(ids: impl IntoIterator<Item = i64>) -> Self {
        let set: BTreeSet<i64> = ids.into_iter().collect();
        if set.is_empty() {
            ScopeSet::Empty
        } else {
            ScopeSet::Restricted(set)
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, ScopeSet::Unrestricted)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ScopeSet::Empty)
    }

    /// 判断某个 id 是否在范围内
    pub fn contains(&self, id: i64) -> bool {
        match self {
            ScopeSet::Unrestricted => true,
            ScopeSet::Empty => false,
            ScopeSet::Restricted(ids) => ids.contains(&id),
        }
    }

    /// 范围内的 id 列表；`Unrestricted` 没有可枚举的 id
    pub fn ids(&self) -> Option<Vec<i64>> {
        match self {
            ScopeSet::Unrestricted => None,
            ScopeSet::Empty => Some(Vec::new()),
            ScopeSet::Restricted(ids) => Some(ids.iter().copied().collect()),
        }
    }

    /// 并集。`Unrestricted` 吸收一切
    pub fn union(&self, other: &ScopeSet) -> ScopeSet {
        match (self, other) {
            (ScopeSet::Unrestricted, _) | (_, ScopeSet::Unrestricted) => ScopeSet::Unrestricted,
            (ScopeSet::Empty, b) => b.clone(),
            (a, ScopeSet::Empty) => a.clone(),
            (ScopeSet::Restricted(a), ScopeSet::Restricted(b)) => {
                ScopeSet::Restricted(a.union(b).copied().collect())
            }
        }
    }

    /// 交集。`Unrestricted` 是单位元
    pub fn intersect(&self, other: &ScopeSet) -> ScopeSet {
        match (self, other) {
            (ScopeSet::Unrestricted, b) => b.clone(),
            (a, ScopeSet::Unrestricted) => a.clone(),
            (ScopeSet::Empty, _) | (_, ScopeSet::Empty) => ScopeSet::Empty,
            (ScopeSet::Restricted(a), ScopeSet::Restricted(b)) => {
                ScopeSet::restricted(a.intersection(b).copied())
            }
        }
    }

    /// 派生范围必须是父范围的子集（单调收窄不变量）
    pub fn is_subset_of(&self, other: &ScopeSet) -> bool {
        match (self, other) {
            (_, ScopeSet::Unrestricted) => true,
            (ScopeSet::Empty, _) => true,
            (ScopeSet::Unrestricted, _) => false,
            (ScopeSet::Restricted(a), ScopeSet::Restricted(b)) => a.is_subset(b),
            (ScopeSet::Restricted(_), ScopeSet::Empty) => false,
        }
    }
}
