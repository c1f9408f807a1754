//! Generator Module
//!
//! The sources a parametric map draws its artifacts from.
//!
//! # Variants
//! - Pure function: `Key -> Artifact`
//! - Sequence source: a stateful iterator, one item per cache miss
//! - Counter source: a shared counter advanced by its owner, read on every miss

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{MapError, Result};
use crate::space::Key;

// == Resolve Trait ==
/// Produces the artifact for a key.
pub trait Resolve<A> {
    fn resolve(&self, key: &Key) -> Result<A>;
}

type KeyFn<A> = Box<dyn Fn(&Key) -> Result<A> + Send + Sync>;
type CounterFn<A> = Box<dyn Fn(u64, &Key) -> Result<A> + Send + Sync>;

// == Pure Function ==
/// Resolves each key with a function of the key alone.
pub struct PureFunction<A> {
    f: KeyFn<A>,
}

impl<A> Resolve<A> for PureFunction<A> {
    fn resolve(&self, key: &Key) -> Result<A> {
        (self.f)(key)
    }
}

// == Sequence Source ==
/// Hands out the next item of an iterator on every resolve.
pub struct SequenceSource<A> {
    items: Mutex<Box<dyn Iterator<Item = A> + Send>>,
}

impl<A> Resolve<A> for SequenceSource<A> {
    fn resolve(&self, _key: &Key) -> Result<A> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| MapError::Generator("sequence source lock poisoned".to_string()))?;
        items.next().ok_or(MapError::Exhausted)
    }
}

// == Counter Source ==
/// Resolves keys against the current value of a shared counter.
pub struct CounterSource<A> {
    counter: Arc<AtomicU64>,
    f: CounterFn<A>,
}

impl<A> CounterSource<A> {
    /// Returns the shared counter so its owner can advance it.
    pub fn counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.counter)
    }
}

impl<A> Resolve<A> for CounterSource<A> {
    fn resolve(&self, key: &Key) -> Result<A> {
        let count = self.counter.load(Ordering::SeqCst);
        (self.f)(count, key)
    }
}

// == Generator ==
/// The artifact source of a parametric map, chosen at construction time.
pub enum Generator<A> {
    Function(PureFunction<A>),
    Sequence(SequenceSource<A>),
    Counter(CounterSource<A>),
}

impl<A> Generator<A> {
    /// Wraps an infallible function of the key.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Key) -> A + Send + Sync + 'static,
    {
        Self::try_function(move |key| Ok(f(key)))
    }

    /// Wraps a fallible function of the key.
    pub fn try_function<F>(f: F) -> Self
    where
        F: Fn(&Key) -> Result<A> + Send + Sync + 'static,
    {
        Generator::Function(PureFunction { f: Box::new(f) })
    }

    /// Draws one item per cache miss from `items`.
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator<Item = A>,
        I::IntoIter: Send + 'static,
    {
        Generator::Sequence(SequenceSource {
            items: Mutex::new(Box::new(items.into_iter())),
        })
    }

    /// Calls `f` with the current value of `counter` on every cache miss.
    pub fn counter<F>(counter: Arc<AtomicU64>, f: F) -> Self
    where
        F: Fn(u64, &Key) -> A + Send + Sync + 'static,
    {
        Generator::Counter(CounterSource {
            counter,
            f: Box::new(move |count: u64, key: &Key| Ok(f(count, key))),
        })
    }

    /// Short name of the variant, used in logs and the HTTP surface.
    pub fn kind(&self) -> &'static str {
        match self {
            Generator::Function(_) => "function",
            Generator::Sequence(_) => "sequence",
            Generator::Counter(_) => "counter",
        }
    }
}

impl<A> Resolve<A> for Generator<A> {
    fn resolve(&self, key: &Key) -> Result<A> {
        match self {
            Generator::Function(source) => source.resolve(key),
            Generator::Sequence(source) => source.resolve(key),
            Generator::Counter(source) => source.resolve(key),
        }
    }
}

impl<A> fmt::Debug for Generator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Generator").field(&self.kind()).finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::key;

    #[test]
    fn test_function_generator() {
        let generator = Generator::function(|key: &Key| key.len() * 10);
        assert_eq!(generator.kind(), "function");
        assert_eq!(generator.resolve(&key![1, 2]).unwrap(), 20);
    }

    #[test]
    fn test_try_function_propagates_errors() {
        let generator: Generator<u32> =
            Generator::try_function(|_| Err(MapError::Generator("no artifact".to_string())));
        assert!(matches!(
            generator.resolve(&key![1]),
            Err(MapError::Generator(_))
        ));
    }

    #[test]
    fn test_sequence_generator_exhausts() {
        let generator = Generator::sequence(vec!["a", "b"]);
        assert_eq!(generator.kind(), "sequence");
        assert_eq!(generator.resolve(&key![0]).unwrap(), "a");
        assert_eq!(generator.resolve(&key![0]).unwrap(), "b");
        assert_eq!(generator.resolve(&key![0]), Err(MapError::Exhausted));
    }

    #[test]
    fn test_counter_generator_reads_shared_counter() {
        let counter = Arc::new(AtomicU64::new(0));
        let generator = Generator::counter(Arc::clone(&counter), |count, key: &Key| {
            format!("{}@{}", key, count)
        });

        assert_eq!(generator.resolve(&key![1]).unwrap(), "(1)@0");
        counter.fetch_add(5, Ordering::SeqCst);
        assert_eq!(generator.resolve(&key![1]).unwrap(), "(1)@5");

        if let Generator::Counter(source) = &generator {
            assert_eq!(source.counter().load(Ordering::SeqCst), 5);
        }
    }

    #[test]
    fn test_generator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Generator<String>>();
    }
}
