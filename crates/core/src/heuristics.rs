//! Structural discrimination of simple union members.
//!
//! For a union without a discriminator property, each complex member needs a
//! runtime test that holds for every instance of that member and for no
//! instance of any other member. Three kinds of test are searched:
//!
//! - [`Heuristic::RequiredProperty`]: a required property no other member can carry.
//! - [`Heuristic::ConstantValue`]: a required constant no other member can match.
//! - [`Heuristic::RequiredProperties`]: a minimal set of required properties
//!   that no other member can carry all of (a minimal hitting set).
//!
//! A member can only be excluded by absence when it is closed: a record with
//! an open map clause may carry any key.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, warn};
use wiremap_ir::{Constant, Union, Value};

use crate::classify::{Declaration, TypeTable, record_layout};

/// Largest required-name set searched exhaustively.
pub const EXACT_SEARCH_LIMIT: usize = 16;

/// A test that identifies one union member.
#[derive(Debug, Clone, PartialEq)]
pub enum Heuristic {
    /// `'name' in x`
    RequiredProperty(String),
    /// `'name' in x && x.name === value`
    ConstantValue(String, Constant),
    /// `'a' in x && 'b' in x && ...`
    RequiredProperties(Vec<String>),
}

/// One property of a member shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeProperty {
    /// IR property name.
    pub name: String,
    /// Present on every instance.
    pub required: bool,
    /// Literal every instance carries, when present.
    pub constant: Option<Constant>,
}

/// Structural summary of a union member.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberShape {
    /// Properties in declaration order.
    pub properties: Vec<ShapeProperty>,
    /// Instances may carry keys beyond `properties`.
    pub open: bool,
}

impl MemberShape {
    fn get(&self, name: &str) -> Option<&ShapeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    fn required(&self) -> impl Iterator<Item = &ShapeProperty> {
        self.properties.iter().filter(|p| p.required)
    }

    /// No instance of this shape can carry `name`.
    fn excludes(&self, name: &str) -> bool {
        !self.open && self.get(name).is_none()
    }
}

/// How a hitting set was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HittingSetMode {
    /// Exhaustive search by increasing size; the result is minimal.
    Exact,
    /// Greedy cover; correct but not necessarily minimal.
    Greedy,
}

/// A set of names intersecting every target set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HittingSet {
    /// Chosen names, in universe order.
    pub names: Vec<String>,
    /// Search used.
    pub mode: HittingSetMode,
}

/// Smallest subset of `universe` sharing at least one name with every set in
/// `targets`. `None` when some target is empty. Exact for universes up to
/// [`EXACT_SEARCH_LIMIT`] names, greedy above.
pub fn minimal_hitting_set(universe: &[String], targets: &[BTreeSet<String>]) -> Option<HittingSet> {
    if targets.iter().any(BTreeSet::is_empty) {
        return None;
    }
    if targets.is_empty() {
        return Some(HittingSet {
            names: vec![],
            mode: HittingSetMode::Exact,
        });
    }
    if universe.len() <= EXACT_SEARCH_LIMIT {
        exact_hitting_set(universe, targets).map(|names| HittingSet {
            names,
            mode: HittingSetMode::Exact,
        })
    } else {
        greedy_hitting_set(universe, targets).map(|names| HittingSet {
            names,
            mode: HittingSetMode::Greedy,
        })
    }
}

fn hits_all(chosen: &[&String], targets: &[BTreeSet<String>]) -> bool {
    targets
        .iter()
        .all(|target| chosen.iter().any(|name| target.contains(*name)))
}

fn exact_hitting_set(universe: &[String], targets: &[BTreeSet<String>]) -> Option<Vec<String>> {
    let n = universe.len();
    for size in 1..=n {
        // Walk index combinations of `size` in lexicographic order.
        let mut indices: Vec<usize> = (0..size).collect();
        loop {
            let chosen: Vec<&String> = indices.iter().map(|&i| &universe[i]).collect();
            if hits_all(&chosen, targets) {
                return Some(chosen.into_iter().cloned().collect());
            }
            let Some(pos) = (0..size).rev().find(|&i| indices[i] != i + n - size) else {
                break;
            };
            indices[pos] += 1;
            for i in pos + 1..size {
                indices[i] = indices[i - 1] + 1;
            }
        }
    }
    None
}

fn greedy_hitting_set(universe: &[String], targets: &[BTreeSet<String>]) -> Option<Vec<String>> {
    let mut remaining: Vec<&BTreeSet<String>> = targets.iter().collect();
    let mut chosen: HashSet<&String> = HashSet::new();
    while !remaining.is_empty() {
        let best = universe
            .iter()
            .filter(|name| !chosen.contains(name))
            .map(|name| (name, remaining.iter().filter(|t| t.contains(name)).count()))
            .filter(|(_, hits)| *hits > 0)
            // First name wins ties.
            .fold(None::<(&String, usize)>, |best, candidate| match best {
                Some((_, hits)) if hits >= candidate.1 => best,
                _ => Some(candidate),
            })?;
        chosen.insert(best.0);
        remaining.retain(|t| !t.contains(best.0));
    }
    Some(
        universe
            .iter()
            .filter(|name| chosen.contains(name))
            .cloned()
            .collect(),
    )
}

/// Heuristics identifying `member` among `others`, grouped by strategy:
/// required properties, then constant values, then one required-property
/// set (searched only when no single required property works). Within a
/// strategy, names follow `member`'s declaration order. Empty when nothing
/// distinguishes the member.
pub fn heuristics(member: &MemberShape, others: &[&MemberShape]) -> Vec<Heuristic> {
    let mut result: Vec<Heuristic> = member
        .required()
        .filter(|p| others.iter().all(|o| o.excludes(&p.name)))
        .map(|p| Heuristic::RequiredProperty(p.name.clone()))
        .collect();
    let found_required = !result.is_empty();

    for p in member.required() {
        let Some(constant) = &p.constant else {
            continue;
        };
        let distinct = others.iter().all(|o| match o.get(&p.name) {
            Some(other) => !o.open && other.constant.as_ref().is_some_and(|c| c != constant),
            None => !o.open,
        });
        if distinct {
            result.push(Heuristic::ConstantValue(p.name.clone(), constant.clone()));
        }
    }

    if !found_required && let Some(names) = required_property_set(member, others) {
        result.push(Heuristic::RequiredProperties(names));
    }
    result
}

fn required_property_set(member: &MemberShape, others: &[&MemberShape]) -> Option<Vec<String>> {
    if others.iter().any(|o| o.open) {
        return None;
    }
    let universe: Vec<String> = member.required().map(|p| p.name.clone()).collect();
    let targets: Vec<BTreeSet<String>> = others
        .iter()
        .map(|o| {
            universe
                .iter()
                .filter(|name| o.get(name).is_none())
                .cloned()
                .collect()
        })
        .collect();
    let found = minimal_hitting_set(&universe, &targets)?;
    if found.mode == HittingSetMode::Greedy {
        warn!(
            names = universe.len(),
            limit = EXACT_SEARCH_LIMIT,
            "Required-property set found greedily and may not be minimal."
        );
    }
    (!found.names.is_empty()).then_some(found.names)
}

/// Structural shape of a union member, flattening nested unions.
///
/// Records map directly. A union is flattened iteratively: a property any
/// alternative declares is kept, required only when every alternative
/// requires it, with a constant only when every declaring alternative agrees
/// and no alternative is open. Nullable and list properties carry no constant.
/// Returns `None` when the value is not a record or union, or a nested
/// union contains anything else.
pub fn member_shape(value: &Value, table: &TypeTable<'_>) -> Option<MemberShape> {
    let root = value.complex_name()?;
    let mut stack = vec![root];
    let mut seen: HashSet<&str> = HashSet::new();
    let mut alternatives: Vec<MemberShape> = Vec::new();

    while let Some(name) = stack.pop() {
        if !seen.insert(name) {
            continue;
        }
        match table.resolve(name)? {
            Declaration::Type(ty) => alternatives.push(record_shape(ty)?),
            Declaration::Union(Union::Simple { members, .. } | Union::Discriminated { members, .. }) => {
                // Reverse so alternatives come out in declaration order.
                for m in members.iter().rev() {
                    stack.push(m.complex_name()?);
                }
            }
            Declaration::Enum(_) => return None,
        }
    }
    debug!(type_name = %root, alternatives = alternatives.len(), "Flattened member shape.");
    merge_alternatives(alternatives)
}

fn record_shape(ty: &wiremap_ir::Type) -> Option<MemberShape> {
    let layout = record_layout(ty).ok()?;
    let mut properties: Vec<ShapeProperty> = layout
        .properties
        .iter()
        .map(|p| ShapeProperty {
            name: p.name.clone(),
            required: !p.value.is_optional,
            // A null or a list never equals the literal.
            constant: if p.value.is_array || p.value.is_nullable {
                None
            } else {
                p.value.constant_value().cloned()
            },
        })
        .collect();
    properties.extend(layout.required_keys.iter().map(|key| ShapeProperty {
        name: key.clone(),
        required: true,
        constant: None,
    }));
    Some(MemberShape {
        properties,
        open: layout.open_map().is_some(),
    })
}

fn merge_alternatives(alternatives: Vec<MemberShape>) -> Option<MemberShape> {
    let mut iter = alternatives.into_iter();
    let mut merged = iter.next()?;
    for alt in iter {
        for p in &mut merged.properties {
            match alt.get(&p.name) {
                Some(other) => {
                    p.required &= other.required;
                    if p.constant != other.constant {
                        p.constant = None;
                    }
                }
                None => {
                    p.required = false;
                    if alt.open {
                        p.constant = None;
                    }
                }
            }
        }
        for other in &alt.properties {
            if merged.get(&other.name).is_none() {
                merged.properties.push(ShapeProperty {
                    name: other.name.clone(),
                    required: false,
                    constant: if merged.open { None } else { other.constant.clone() },
                });
            }
        }
        merged.open |= alt.open;
    }
    Some(merged)
}
