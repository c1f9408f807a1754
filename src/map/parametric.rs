//! Parametric Map Module
//!
//! Lazily resolves keys of a declared parameter space into cached artifacts.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore, DEFAULT_CAPACITY};
use crate::error::{MapError, Result};
use crate::map::{Generator, Resolve};
use crate::space::{Bounds, Constraint, DimRef, Dimension, Interval, Key, Selection, Value};
use crate::stream::{Contents, Stream};

// == Mode ==
/// How strictly keys are checked before their artifact is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every dimension is bounded; keys are validated against the bounds
    Bounded,
    /// At least one dimension is open; keys are supplied externally
    Sampled,
}

// == Parametric Map ==
/// A lazily evaluated, LRU-cached map from keys to artifacts.
///
/// Artifacts are computed by the generator on first access and kept until
/// evicted. Narrowing operations ([`select`](Self::select)) return a new map
/// that shares the generator and leaves the receiver untouched.
#[derive(Debug, Clone)]
pub struct ParametricMap<A> {
    /// Declared dimensions, in key order
    dimensions: Vec<Dimension>,
    /// Artifact source shared with derived maps
    generator: Arc<Generator<A>>,
    /// Bounded artifact cache
    cache: CacheStore<A>,
    /// Per-dimension soft range, inside the declared extent
    soft_ranges: Vec<Option<Interval>>,
}

impl<A> ParametricMap<A> {
    // == Constructor ==
    /// Creates a map over `dimensions` with the default capacity.
    ///
    /// Fails if no dimensions are given or a name is empty or repeated.
    pub fn new(dimensions: Vec<Dimension>, generator: Generator<A>) -> Result<Self> {
        if dimensions.is_empty() {
            return Err(MapError::InvalidDimension(
                "a parametric map needs at least one dimension".to_string(),
            ));
        }

        {
            let mut seen = HashSet::new();
            for dimension in &dimensions {
                if dimension.name().is_empty() {
                    return Err(MapError::InvalidDimension(
                        "dimension names cannot be empty".to_string(),
                    ));
                }
                if !seen.insert(dimension.name()) {
                    return Err(MapError::InvalidDimension(format!(
                        "dimension '{}' is declared more than once",
                        dimension.name()
                    )));
                }
            }
        }

        let soft_ranges = vec![None; dimensions.len()];
        Ok(Self {
            dimensions,
            generator: Arc::new(generator),
            cache: CacheStore::new(DEFAULT_CAPACITY)?,
            soft_ranges,
        })
    }

    /// Sets the cache capacity, discarding any cached artifacts.
    pub fn with_capacity(mut self, capacity: usize) -> Result<Self> {
        self.cache = CacheStore::new(capacity)?;
        Ok(self)
    }

    // == Accessors ==
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Looks up a dimension by name or position.
    pub fn dimension(&self, dimension: impl Into<DimRef>) -> Result<&Dimension> {
        let index = self.index_of(&dimension.into())?;
        Ok(&self.dimensions[index])
    }

    pub fn mode(&self) -> Mode {
        if self.dimensions.iter().all(Dimension::is_bounded) {
            Mode::Bounded
        } else {
            Mode::Sampled
        }
    }

    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    pub fn generator_kind(&self) -> &'static str {
        self.generator.kind()
    }

    pub fn soft_ranges(&self) -> &[Option<Interval>] {
        &self.soft_ranges
    }

    /// Returns the soft range set on a dimension, if any.
    pub fn soft_range(&self, dimension: impl Into<DimRef>) -> Result<Option<Interval>> {
        let index = self.index_of(&dimension.into())?;
        Ok(self.soft_ranges[index])
    }

    /// Returns the soft range of a dimension, falling back to its declared extent.
    pub fn effective_range(&self, dimension: impl Into<DimRef>) -> Result<Option<Interval>> {
        let index = self.index_of(&dimension.into())?;
        Ok(self.soft_ranges[index].or_else(|| self.dimensions[index].extent()))
    }

    // == Get ==
    /// Returns the artifact for `key`, computing and caching it on first access.
    ///
    /// A cached key is returned as-is and becomes most recently used.
    /// Otherwise the key is checked for arity and, in bounded mode, against
    /// every dimension's declared bounds before the generator runs.
    pub fn get(&mut self, key: &Key) -> Result<&A> {
        let dimensions = &self.dimensions;
        let generator = &self.generator;
        self.cache.get_or_try_insert_with(key, || {
            validate_key(dimensions, key)?;
            generator.resolve(key)
        })
    }

    // == Streams ==
    /// Builds a key from stream contents, taking each dimension's value by name.
    ///
    /// Contents naming no dimension are ignored.
    pub fn key_from_contents(&self, contents: &Contents) -> Result<Key> {
        self.dimensions
            .iter()
            .map(|dimension| {
                contents.get(dimension.name()).cloned().ok_or_else(|| {
                    MapError::StreamParameter(format!(
                        "no stream supplies a value for dimension '{}'",
                        dimension.name()
                    ))
                })
            })
            .collect::<Result<Vec<Value>>>()
            .map(Key::new)
    }

    /// Resolves the key described by the merged contents of `streams`.
    pub fn get_from_streams(&mut self, streams: &[&Stream]) -> Result<&A> {
        let key = self.key_from_contents(&Stream::merged(streams))?;
        self.get(&key)
    }

    /// Returns a cached artifact without computing it or touching recency.
    pub fn peek(&self, key: &Key) -> Option<&A> {
        self.cache.peek(key)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.cache.contains(key)
    }

    // == Keys ==
    /// Returns the cached keys in insertion order.
    pub fn keys(&self) -> Vec<Key> {
        self.cache.keys()
    }

    /// Returns cached keys and artifacts in insertion order.
    pub fn entries(&self) -> Vec<(&Key, &A)> {
        self.cache.entries_in_order()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    // == Sample ==
    /// Resolves every key of an evenly spaced grid over the bounded space.
    ///
    /// Value sets contribute their values (inside the soft range when one is
    /// set); ranges contribute `samples_per_dimension` points from the soft
    /// range or declared range. Returns the sampled keys in grid order.
    pub fn sample(&mut self, samples_per_dimension: usize) -> Result<Vec<Key>> {
        if samples_per_dimension == 0 {
            return Err(MapError::Constraint(
                "sample count must be at least 1".to_string(),
            ));
        }

        let mut axes = Vec::with_capacity(self.dimensions.len());
        for (index, dimension) in self.dimensions.iter().enumerate() {
            let axis: Vec<Value> = match dimension.bounds() {
                Bounds::Open => {
                    return Err(MapError::OpenDimension(dimension.name().to_string()));
                }
                // A zero-width range collapses to a single point
                Bounds::Range(declared) => distinct(
                    self.soft_ranges[index]
                        .unwrap_or(*declared)
                        .linspace(samples_per_dimension)
                        .into_iter()
                        .map(Value::from),
                ),
                Bounds::Values(_) => self.axis_values(index)?,
            };
            axes.push(axis);
        }

        let keys = cartesian_product(&axes);
        if keys.len() > self.capacity() {
            warn!(
                "Sample grid of {} keys exceeds cache capacity {}; earliest samples will be evicted",
                keys.len(),
                self.capacity()
            );
        }

        for key in &keys {
            self.get(key)?;
        }

        info!("Sampled {} keys across {} dimensions", keys.len(), axes.len());
        Ok(keys)
    }

    // == Selection Size ==
    /// Returns how many keys `select` would hold for `selection`.
    ///
    /// A discrete selection yields its product size, computed without
    /// resolving anything; a range selection can hold at most the cached keys.
    pub fn selection_size(&self, selection: &Selection) -> Result<usize> {
        Ok(match self.plan(selection)? {
            Narrowing::Product(axes) => axes
                .iter()
                .fold(1usize, |size, axis| size.saturating_mul(axis.len())),
            Narrowing::Unchanged | Narrowing::Soft(_) => self.len(),
        })
    }

    fn plan(&self, selection: &Selection) -> Result<Narrowing> {
        if selection.is_empty() {
            return Ok(Narrowing::Unchanged);
        }

        let mut resolved: Vec<Option<&Constraint>> = vec![None; self.dimensions.len()];
        for (dimension, constraint) in selection.constraints() {
            let index = self.index_of(dimension)?;
            if resolved[index].is_some() {
                return Err(MapError::Constraint(format!(
                    "dimension '{}' is constrained more than once",
                    self.dimensions[index].name()
                )));
            }
            resolved[index] = Some(constraint);
        }

        let ranges = selection
            .constraints()
            .iter()
            .filter(|(_, constraint)| constraint.is_range())
            .count();

        if ranges == 0 {
            self.product_axes(&resolved).map(Narrowing::Product)
        } else if ranges == selection.len() {
            self.soft_ranges_for(&resolved).map(Narrowing::Soft)
        } else {
            Err(mixed_constraints())
        }
    }

    fn product_axes(&self, resolved: &[Option<&Constraint>]) -> Result<Vec<Vec<Value>>> {
        let mut axes = Vec::with_capacity(self.dimensions.len());
        for (index, (dimension, constraint)) in self.dimensions.iter().zip(resolved).enumerate() {
            let axis = match constraint {
                Some(Constraint::Values(values)) => {
                    if let Some(value) = values.iter().find(|value| !dimension.admits(value)) {
                        return Err(MapError::Constraint(format!(
                            "value {} is outside the declared bounds of dimension '{}'",
                            value,
                            dimension.name()
                        )));
                    }
                    let axis = distinct(values.iter().cloned());
                    if axis.is_empty() {
                        return Err(MapError::Constraint(format!(
                            "empty value set for dimension '{}'",
                            dimension.name()
                        )));
                    }
                    axis
                }
                Some(Constraint::Range { .. }) => return Err(mixed_constraints()),
                None => self.axis_values(index)?,
            };
            axes.push(axis);
        }
        Ok(axes)
    }

    fn soft_ranges_for(&self, resolved: &[Option<&Constraint>]) -> Result<Vec<Option<Interval>>> {
        let mut soft_ranges = self.soft_ranges.clone();
        for (index, (dimension, constraint)) in self.dimensions.iter().zip(resolved).enumerate() {
            let (min, max) = match constraint {
                Some(Constraint::Range { min, max }) => (*min, *max),
                Some(Constraint::Values(_)) => return Err(mixed_constraints()),
                None => continue,
            };

            let extent = dimension.extent().ok_or_else(|| {
                MapError::Constraint(format!(
                    "dimension '{}' has no numeric extent to narrow",
                    dimension.name()
                ))
            })?;
            let interval = Interval::new(min, max).map_err(|_| {
                MapError::Constraint(format!(
                    "range [{}, {}] on dimension '{}' is not a valid interval",
                    min,
                    max,
                    dimension.name()
                ))
            })?;
            if !extent.encloses(&interval) {
                return Err(MapError::Constraint(format!(
                    "range [{}, {}] exceeds the declared extent [{}, {}] of dimension '{}'",
                    min,
                    max,
                    extent.min,
                    extent.max,
                    dimension.name()
                )));
            }
            soft_ranges[index] = Some(interval);
        }
        Ok(soft_ranges)
    }

    // == Helpers ==
    fn index_of(&self, dimension: &DimRef) -> Result<usize> {
        match dimension {
            DimRef::Index(index) if *index < self.dimensions.len() => Ok(*index),
            DimRef::Index(index) => Err(MapError::Constraint(format!(
                "dimension index {} is out of range for {} dimensions",
                index,
                self.dimensions.len()
            ))),
            DimRef::Name(name) => self
                .dimensions
                .iter()
                .position(|d| d.name() == name)
                .ok_or_else(|| MapError::Constraint(format!("unknown dimension '{}'", name))),
        }
    }

    /// Declared values of a value-set dimension, restricted to its soft range.
    fn axis_values(&self, index: usize) -> Result<Vec<Value>> {
        let dimension = &self.dimensions[index];
        let declared = dimension.declared_values().ok_or_else(|| {
            MapError::Constraint(format!(
                "dimension '{}' has no declared values; constrain it explicitly",
                dimension.name()
            ))
        })?;

        let soft = self.soft_ranges[index];
        let values: Vec<Value> = declared
            .iter()
            .filter(|value| match soft {
                Some(range) => value.as_f64().is_some_and(|x| range.contains(x)),
                None => true,
            })
            .cloned()
            .collect();

        if values.is_empty() {
            return Err(MapError::Constraint(format!(
                "no declared values of dimension '{}' fall inside its soft range",
                dimension.name()
            )));
        }
        Ok(values)
    }
}

impl<A: Clone> ParametricMap<A> {
    // == Select ==
    /// Returns a new map narrowed by `selection`.
    ///
    /// Discrete constraints produce a map holding exactly the Cartesian
    /// product of the selected values (unconstrained value-set dimensions
    /// contribute all of their values). Range constraints produce a map with
    /// narrowed soft ranges that keeps the cached entries inside them.
    /// Mixing the two kinds in one call is rejected.
    pub fn select(&self, selection: &Selection) -> Result<Self> {
        match self.plan(selection)? {
            Narrowing::Unchanged => Ok(self.clone()),
            Narrowing::Product(axes) => self.populate(&axes),
            Narrowing::Soft(soft_ranges) => self.narrow(soft_ranges),
        }
    }

    fn populate(&self, axes: &[Vec<Value>]) -> Result<Self> {
        let keys = cartesian_product(axes);
        let capacity = self.capacity().max(keys.len());
        let mut cache = CacheStore::new(capacity)?;
        let mut reused = 0usize;

        for key in keys {
            let artifact = match self.cache.peek(&key) {
                Some(artifact) => {
                    reused += 1;
                    artifact.clone()
                }
                None => {
                    let artifact = self.generator.resolve(&key)?;
                    cache.record_computation();
                    artifact
                }
            };
            cache.insert(key, artifact);
        }

        debug!(
            "Discrete selection populated {} keys ({} reused from parent)",
            cache.len(),
            reused
        );

        Ok(Self {
            dimensions: self.dimensions.clone(),
            generator: Arc::clone(&self.generator),
            cache,
            soft_ranges: self.soft_ranges.clone(),
        })
    }

    fn narrow(&self, soft_ranges: Vec<Option<Interval>>) -> Result<Self> {
        let mut cache = CacheStore::new(self.capacity())?;
        for (key, artifact) in self.cache.entries_in_order() {
            if within_soft_ranges(&soft_ranges, key) {
                cache.insert(key.clone(), artifact.clone());
            }
        }

        debug!(
            "Range selection kept {} of {} cached keys",
            cache.len(),
            self.cache.len()
        );

        Ok(Self {
            dimensions: self.dimensions.clone(),
            generator: Arc::clone(&self.generator),
            cache,
            soft_ranges,
        })
    }

    // == Materialize ==
    /// Returns a snapshot of every cached key and artifact.
    ///
    /// Recency and statistics are left untouched.
    pub fn as_materialized(&self) -> BTreeMap<Key, A> {
        self.cache
            .entries_in_order()
            .into_iter()
            .map(|(key, artifact)| (key.clone(), artifact.clone()))
            .collect()
    }
}

// == Narrowing ==
/// What a selection does to a map, worked out before anything is resolved.
enum Narrowing {
    Unchanged,
    Product(Vec<Vec<Value>>),
    Soft(Vec<Option<Interval>>),
}

// == Free Functions ==
fn mixed_constraints() -> MapError {
    MapError::Constraint(
        "range and discrete constraints cannot be mixed in one selection".to_string(),
    )
}

/// Drops repeated values, keeping first occurrences in order.
fn distinct(values: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

fn validate_key(dimensions: &[Dimension], key: &Key) -> Result<()> {
    if key.len() != dimensions.len() {
        return Err(MapError::Arity {
            expected: dimensions.len(),
            actual: key.len(),
        });
    }

    // Sampled maps take keys from external context and skip bounds checks
    if !dimensions.iter().all(Dimension::is_bounded) {
        return Ok(());
    }

    for (dimension, value) in dimensions.iter().zip(key.values()) {
        if !dimension.admits(value) {
            return Err(MapError::Domain {
                dimension: dimension.name().to_string(),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

fn within_soft_ranges(soft_ranges: &[Option<Interval>], key: &Key) -> bool {
    soft_ranges.iter().enumerate().all(|(index, range)| match range {
        Some(range) => key
            .get(index)
            .and_then(Value::as_f64)
            .is_some_and(|x| range.contains(x)),
        None => true,
    })
}

/// Row-major product: the last axis varies fastest.
fn cartesian_product(axes: &[Vec<Value>]) -> Vec<Key> {
    let mut prefixes: Vec<Vec<Value>> = vec![Vec::new()];
    for axis in axes {
        prefixes = prefixes
            .into_iter()
            .flat_map(|prefix| {
                axis.iter().map(move |value| {
                    let mut key = prefix.clone();
                    key.push(value.clone());
                    key
                })
            })
            .collect();
    }
    prefixes.into_iter().map(Key::new).collect()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::key;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    fn counted_map(capacity: usize) -> (ParametricMap<String>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let generator = Generator::function(move |key: &Key| {
            counter.fetch_add(1, Ordering::SeqCst);
            format!("shape{}", key)
        });
        let map = ParametricMap::new(
            vec![
                Dimension::values("N", [2, 3, 4, 5]).unwrap(),
                Dimension::values("radius", [0.7, 0.8, 0.9, 1.0]).unwrap(),
            ],
            generator,
        )
        .unwrap()
        .with_capacity(capacity)
        .unwrap();
        (map, calls)
    }

    #[test]
    fn test_new_rejects_bad_dimensions() {
        let none: Result<ParametricMap<()>> = ParametricMap::new(vec![], Generator::function(|_| ()));
        assert!(matches!(none, Err(MapError::InvalidDimension(_))));

        let duplicate: Result<ParametricMap<()>> = ParametricMap::new(
            vec![Dimension::open("x"), Dimension::open("x")],
            Generator::function(|_| ()),
        );
        assert!(matches!(duplicate, Err(MapError::InvalidDimension(_))));

        let unnamed: Result<ParametricMap<()>> =
            ParametricMap::new(vec![Dimension::open("")], Generator::function(|_| ()));
        assert!(matches!(unnamed, Err(MapError::InvalidDimension(_))));
    }

    #[test]
    fn test_default_capacity() {
        let map = ParametricMap::new(vec![Dimension::open("x")], Generator::function(|_| 0))
            .unwrap();
        assert_eq!(map.capacity(), DEFAULT_CAPACITY);
        assert_eq!(map.generator_kind(), "function");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = ParametricMap::new(vec![Dimension::open("x")], Generator::function(|_| 0))
            .unwrap()
            .with_capacity(0);
        assert!(matches!(result, Err(MapError::InvalidConfig(_))));
    }

    #[test]
    fn test_get_memoizes() {
        let (mut map, calls) = counted_map(10);

        let first = map.get(&key![2, 0.7]).unwrap().clone();
        let second = map.get(&key![2, 0.7]).unwrap().clone();

        assert_eq!(first, "shape(2, 0.7)");
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_get_integer_and_float_keys_share_entry() {
        let (mut map, calls) = counted_map(10);

        map.get(&key![3, 1]).unwrap();
        map.get(&key![3.0, 1.0]).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_get_out_of_domain() {
        let (mut map, calls) = counted_map(10);

        let result = map.get(&key![6, 0.7]);
        assert_eq!(
            result,
            Err(MapError::Domain {
                dimension: "N".to_string(),
                value: "6".to_string()
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn test_get_wrong_arity() {
        let (mut map, _) = counted_map(10);

        let result = map.get(&key![2]);
        assert_eq!(
            result,
            Err(MapError::Arity {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_capacity_one_recomputes() {
        let (mut map, calls) = counted_map(1);

        map.get(&key![2, 0.7]).unwrap();
        map.get(&key![3, 0.7]).unwrap();
        map.get(&key![2, 0.7]).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_sampled_mode_skips_bounds() {
        let mut map = ParametricMap::new(
            vec![Dimension::open("frame"), Dimension::range("x", 0.0, 1.0).unwrap()],
            Generator::function(|key: &Key| key.to_string()),
        )
        .unwrap();

        assert_eq!(map.mode(), Mode::Sampled);
        assert_eq!(map.get(&key![42, 5.0]).unwrap(), "(42, 5)");
        assert!(matches!(
            map.get(&key![42]),
            Err(MapError::Arity { .. })
        ));
    }

    #[test]
    fn test_bounded_mode() {
        let (map, _) = counted_map(10);
        assert_eq!(map.mode(), Mode::Bounded);
    }

    #[test]
    fn test_select_cartesian_product() {
        let (map, _) = counted_map(10);

        let selected = map
            .select(
                &Selection::new()
                    .values("N", [2, 3])
                    .values("radius", [0.7, 0.8]),
            )
            .unwrap();

        assert_eq!(
            selected.keys(),
            vec![key![2, 0.7], key![2, 0.8], key![3, 0.7], key![3, 0.8]]
        );
        assert!(map.is_empty(), "select must not mutate the receiver");
    }

    #[test]
    fn test_select_reuses_cached_artifacts() {
        let (mut map, calls) = counted_map(10);
        map.get(&key![2, 0.7]).unwrap();

        let selected = map
            .select(&Selection::new().values("N", [2]).values("radius", [0.7, 0.8]))
            .unwrap();

        assert_eq!(selected.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(selected.stats().computations, 1);
    }

    #[test]
    fn test_select_fills_unconstrained_value_dimension() {
        let (map, _) = counted_map(10);

        let selected = map.select(&Selection::new().values(0usize, [5])).unwrap();

        assert_eq!(
            selected.keys(),
            vec![key![5, 0.7], key![5, 0.8], key![5, 0.9], key![5, 1]]
        );
    }

    #[test]
    fn test_select_grows_capacity_to_fit_product() {
        let (map, _) = counted_map(2);

        let selected = map.select(&Selection::new().values("N", [2, 3])).unwrap();

        assert_eq!(selected.len(), 8);
        assert_eq!(selected.capacity(), 8);
        assert_eq!(map.capacity(), 2);
    }

    #[test]
    fn test_select_rejects_out_of_bounds_value() {
        let (map, _) = counted_map(10);
        let result = map.select(&Selection::new().values("N", [9]));
        assert!(matches!(result, Err(MapError::Constraint(_))));
    }

    #[test]
    fn test_select_rejects_mixed_constraints() {
        let (map, _) = counted_map(10);
        let result = map.select(
            &Selection::new()
                .values("N", [2])
                .range("radius", 0.7, 0.8),
        );
        assert!(matches!(result, Err(MapError::Constraint(_))));
    }

    #[test]
    fn test_select_rejects_unknown_and_repeated_dimensions() {
        let (map, _) = counted_map(10);

        let unknown = map.select(&Selection::new().values("sides", [2]));
        assert!(matches!(unknown, Err(MapError::Constraint(_))));

        let out_of_range = map.select(&Selection::new().values(7usize, [2]));
        assert!(matches!(out_of_range, Err(MapError::Constraint(_))));

        let repeated = map.select(&Selection::new().values("N", [2]).values(0usize, [3]));
        assert!(matches!(repeated, Err(MapError::Constraint(_))));
    }

    #[test]
    fn test_select_range_sets_soft_range() {
        let (mut map, _) = counted_map(10);
        map.get(&key![2, 0.7]).unwrap();
        map.get(&key![2, 1.0]).unwrap();

        let narrowed = map.select(&Selection::new().range("radius", 0.7, 0.85)).unwrap();

        assert_eq!(
            narrowed.soft_range("radius").unwrap(),
            Some(Interval::new(0.7, 0.85).unwrap())
        );
        assert_eq!(narrowed.keys(), vec![key![2, 0.7]]);
        assert_eq!(map.soft_range("radius").unwrap(), None);
        assert_eq!(
            narrowed.dimension("radius").unwrap(),
            map.dimension("radius").unwrap()
        );
    }

    #[test]
    fn test_select_range_cannot_exceed_declared_extent() {
        let map = ParametricMap::new(
            vec![Dimension::range("x", 0.0, 1.0).unwrap()],
            Generator::function(|_| ()),
        )
        .unwrap();

        let too_wide = map.select(&Selection::new().range("x", -0.5, 0.5));
        assert!(matches!(too_wide, Err(MapError::Constraint(_))));

        let inverted = map.select(&Selection::new().range("x", 0.8, 0.2));
        assert!(matches!(inverted, Err(MapError::Constraint(_))));

        let narrowed = map.select(&Selection::new().range("x", 0.2, 0.8)).unwrap();
        assert_eq!(
            narrowed.effective_range("x").unwrap(),
            Some(Interval::new(0.2, 0.8).unwrap())
        );
    }

    #[test]
    fn test_select_range_on_open_dimension_rejected() {
        let map = ParametricMap::new(vec![Dimension::open("frame")], Generator::function(|_| ()))
            .unwrap();
        let result = map.select(&Selection::new().range("frame", 0.0, 1.0));
        assert!(matches!(result, Err(MapError::Constraint(_))));
    }

    #[test]
    fn test_select_empty_returns_copy() {
        let (mut map, _) = counted_map(10);
        map.get(&key![4, 0.9]).unwrap();

        let copy = map.select(&Selection::new()).unwrap();
        assert_eq!(copy.keys(), map.keys());
    }

    #[test]
    fn test_keys_in_insertion_order() {
        let (mut map, _) = counted_map(10);

        map.get(&key![5, 1]).unwrap();
        map.get(&key![2, 0.7]).unwrap();
        map.get(&key![5, 1]).unwrap();

        assert_eq!(map.keys(), vec![key![5, 1], key![2, 0.7]]);
    }

    #[test]
    fn test_as_materialized() {
        let (mut map, _) = counted_map(10);
        map.get(&key![3, 0.8]).unwrap();
        map.get(&key![2, 0.7]).unwrap();

        let snapshot = map.as_materialized();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[&key![3, 0.8]], "shape(3, 0.8)");
        assert_eq!(map.stats().hits, 0);
    }

    #[test]
    fn test_sample_grid() {
        let mut map = ParametricMap::new(
            vec![
                Dimension::values("N", [2, 3]).unwrap(),
                Dimension::range("radius", 0.5, 1.0).unwrap(),
            ],
            Generator::function(|key: &Key| key.to_string()),
        )
        .unwrap();

        let keys = map.sample(3).unwrap();

        assert_eq!(keys.len(), 6);
        assert_eq!(keys[0], key![2, 0.5]);
        assert_eq!(keys[1], key![2, 0.75]);
        assert_eq!(keys[5], key![3, 1.0]);
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn test_sample_respects_soft_range() {
        let (map, _) = counted_map(20);
        let mut narrowed = map.select(&Selection::new().range("N", 4.0, 5.0)).unwrap();

        let keys = narrowed.sample(1).unwrap();
        assert_eq!(keys.len(), 8);
        assert!(keys.iter().all(|k| k.get(0).and_then(Value::as_f64) >= Some(4.0)));
    }

    #[test]
    fn test_sample_rejects_open_and_zero() {
        let mut open = ParametricMap::new(vec![Dimension::open("frame")], Generator::function(|_| ()))
            .unwrap();
        assert_eq!(
            open.sample(2),
            Err(MapError::OpenDimension("frame".to_string()))
        );

        let (mut map, _) = counted_map(10);
        assert!(matches!(map.sample(0), Err(MapError::Constraint(_))));
    }

    #[test]
    fn test_sequence_generator_in_map() {
        let mut map = ParametricMap::new(
            vec![Dimension::open("frame")],
            Generator::sequence(vec!["first", "second"]),
        )
        .unwrap();

        assert_eq!(*map.get(&key![0]).unwrap(), "first");
        assert_eq!(*map.get(&key![0]).unwrap(), "first");
        assert_eq!(*map.get(&key![1]).unwrap(), "second");
        assert_eq!(map.get(&key![2]), Err(MapError::Exhausted));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_counter_generator_in_map() {
        let counter = Arc::new(AtomicU64::new(10));
        let mut map = ParametricMap::new(
            vec![Dimension::open("x")],
            Generator::counter(Arc::clone(&counter), |count, _key: &Key| count),
        )
        .unwrap();

        assert_eq!(*map.get(&key!["a"]).unwrap(), 10);
        counter.fetch_add(1, Ordering::SeqCst);
        assert_eq!(*map.get(&key!["a"]).unwrap(), 10);
        assert_eq!(*map.get(&key!["b"]).unwrap(), 11);
        assert_eq!(map.generator_kind(), "counter");
    }

    #[test]
    fn test_sample_zero_width_range_yields_one_key() {
        let mut map = ParametricMap::new(
            vec![Dimension::range("radius", 0.5, 0.5).unwrap()],
            Generator::function(|key: &Key| key.to_string()),
        )
        .unwrap();

        let keys = map.sample(5).unwrap();

        assert_eq!(keys, vec![key![0.5]]);
        assert_eq!(map.stats().hits, 0);
    }

    #[test]
    fn test_sample_zero_width_soft_range_yields_one_key() {
        let map = ParametricMap::new(
            vec![
                Dimension::values("N", [2, 3]).unwrap(),
                Dimension::range("radius", 0.0, 1.0).unwrap(),
            ],
            Generator::function(|key: &Key| key.to_string()),
        )
        .unwrap();
        let mut narrowed = map.select(&Selection::new().range("radius", 0.3, 0.3)).unwrap();

        let keys = narrowed.sample(4).unwrap();

        assert_eq!(keys, vec![key![2, 0.3], key![3, 0.3]]);
        assert_eq!(narrowed.stats().hits, 0);
    }

    #[test]
    fn test_select_drops_repeated_values() {
        let (map, calls) = counted_map(10);

        let selected = map
            .select(&Selection::new().values("N", [2, 2, 3]).values("radius", [0.7, 0.7]))
            .unwrap();

        assert_eq!(selected.keys(), vec![key![2, 0.7], key![3, 0.7]]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_selection_size_resolves_nothing() {
        let (mut map, calls) = counted_map(10);
        map.get(&key![2, 0.7]).unwrap();

        let product = Selection::new().values("N", [2, 3, 4]);
        assert_eq!(map.selection_size(&product).unwrap(), 12);
        assert_eq!(map.selection_size(&Selection::new()).unwrap(), 1);
        assert_eq!(
            map.selection_size(&Selection::new().range("radius", 0.7, 0.8))
                .unwrap(),
            1
        );
        assert!(map
            .selection_size(&Selection::new().values("N", [2]).range("radius", 0.7, 0.8))
            .is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_large_integer_keys_do_not_collide() {
        let mut map = ParametricMap::new(
            vec![Dimension::open("id")],
            Generator::function(|key: &Key| key.to_string()),
        )
        .unwrap();

        let above = map.get(&key![9_007_199_254_740_993i64]).unwrap().clone();
        let below = map.get(&key![9_007_199_254_740_992i64]).unwrap().clone();

        assert_eq!(above, "(9007199254740993)");
        assert_eq!(below, "(9007199254740992)");
        assert_eq!(map.len(), 2);
        assert_eq!(map.stats().hits, 0);
    }

    #[test]
    fn test_get_from_streams() {
        let mut map = ParametricMap::new(
            vec![Dimension::open("frame"), Dimension::range("x", 0.0, 1.0).unwrap()],
            Generator::function(|key: &Key| key.to_string()),
        )
        .unwrap();
        let frame = Stream::new("Frame", [("frame", 3)]).unwrap();
        let position = Stream::new("PositionX", [("x", 0.25), ("y", 9.0)]).unwrap();

        let artifact = map.get_from_streams(&[&position, &frame]).unwrap();

        assert_eq!(artifact, "(3, 0.25)");
        assert_eq!(map.keys(), vec![key![3, 0.25]]);
    }

    #[test]
    fn test_get_from_streams_missing_dimension() {
        let (mut map, calls) = counted_map(10);
        let position = Stream::new("PositionX", [("N", 3)]).unwrap();

        let result = map.get_from_streams(&[&position]);

        assert!(matches!(result, Err(MapError::StreamParameter(msg)) if msg.contains("'radius'")));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cartesian_product_order() {
        let axes = vec![
            vec![Value::from(1), Value::from(2)],
            vec![Value::from("a"), Value::from("b"), Value::from("c")],
        ];
        let keys = cartesian_product(&axes);
        assert_eq!(keys.len(), 6);
        assert_eq!(keys[0], key![1, "a"]);
        assert_eq!(keys[2], key![1, "c"]);
        assert_eq!(keys[3], key![2, "a"]);
    }
}
