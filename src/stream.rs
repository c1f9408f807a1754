//! Streams Module
//!
//! Streams carry named values from outside a map, typically the coordinates
//! a sampled map should show next. Subscribers are notified with the stream's
//! contents whenever it is updated or triggered.
//!
//! Parameters are declared once, when the stream is created, and can only be
//! changed through [`Stream::update`]. A stream may rename its parameters so
//! that its contents line up with a map's dimension names.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{MapError, Result};
use crate::space::Value;

/// Stream contents keyed by (renamed) parameter name.
pub type Contents = BTreeMap<String, Value>;

/// Callback invoked with the contents of one or more streams.
pub type Subscriber = Arc<dyn Fn(&Contents) + Send + Sync>;

// == Stream ==
/// A named set of values with subscribers.
#[derive(Clone)]
pub struct Stream {
    /// Label used in error messages
    kind: String,
    /// Parameter values in declaration order
    parameters: Vec<(String, Value)>,
    /// Parameter name to the name it is published under
    rename: HashMap<String, String>,
    subscribers: Vec<Subscriber>,
}

impl Stream {
    // == Constructor ==
    /// Declares a stream with the given parameters and their initial values.
    ///
    /// Fails if a parameter name is empty or repeated.
    pub fn new<N, V>(
        kind: impl Into<String>,
        parameters: impl IntoIterator<Item = (N, V)>,
    ) -> Result<Self>
    where
        N: Into<String>,
        V: Into<Value>,
    {
        let kind = kind.into();
        let mut declared: Vec<(String, Value)> = Vec::new();
        for (name, value) in parameters {
            let name = name.into();
            if name.is_empty() {
                return Err(MapError::StreamParameter(format!(
                    "stream {} declares an unnamed parameter",
                    kind
                )));
            }
            if declared.iter().any(|(existing, _)| *existing == name) {
                return Err(MapError::StreamParameter(format!(
                    "stream {} declares '{}' more than once",
                    kind, name
                )));
            }
            declared.push((name, value.into()));
        }

        Ok(Self {
            kind,
            parameters: declared,
            rename: HashMap::new(),
            subscribers: Vec::new(),
        })
    }

    pub fn with_subscriber(mut self, subscriber: Subscriber) -> Self {
        self.subscribe(subscriber);
        self
    }

    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    /// Declared parameter names, before renaming.
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|(name, _)| name.as_str())
    }

    fn published_name<'a>(&'a self, parameter: &'a str) -> &'a str {
        self.rename
            .get(parameter)
            .map(String::as_str)
            .unwrap_or(parameter)
    }

    // == Contents ==
    /// Current values under their published names.
    pub fn contents(&self) -> Contents {
        self.parameters
            .iter()
            .map(|(name, value)| (self.published_name(name).to_string(), value.clone()))
            .collect()
    }

    // == Update ==
    /// Sets parameter values by their declared names.
    ///
    /// Nothing changes if any name is unknown. Subscribers are notified only
    /// when `trigger` is set.
    pub fn update<N, V>(
        &mut self,
        values: impl IntoIterator<Item = (N, V)>,
        trigger: bool,
    ) -> Result<()>
    where
        N: AsRef<str>,
        V: Into<Value>,
    {
        let mut changes = Vec::new();
        for (name, value) in values {
            let name = name.as_ref();
            let index = self
                .parameters
                .iter()
                .position(|(declared, _)| declared == name)
                .ok_or_else(|| {
                    MapError::StreamParameter(format!(
                        "'{}' is not a parameter of stream {}",
                        name, self.kind
                    ))
                })?;
            changes.push((index, value.into()));
        }

        for (index, value) in changes {
            self.parameters[index].1 = value;
        }

        if trigger {
            self.notify();
        }
        Ok(())
    }

    fn notify(&self) {
        let contents = self.contents();
        debug!(
            "Stream {} notifying {} subscribers",
            self.kind,
            self.subscribers.len()
        );
        for subscriber in &self.subscribers {
            subscriber(&contents);
        }
    }

    // == Rename ==
    /// Returns a copy publishing parameters under new names.
    ///
    /// `mapping` goes from declared parameter name to published name and
    /// replaces any earlier renaming. A parameter cannot take the name of
    /// another declared parameter, and two parameters cannot share a name.
    pub fn rename<F, T>(&self, mapping: impl IntoIterator<Item = (F, T)>) -> Result<Self>
    where
        F: Into<String>,
        T: Into<String>,
    {
        let mut rename = HashMap::new();
        for (from, to) in mapping {
            let (from, to) = (from.into(), to.into());
            if !self.parameters().any(|name| name == from) {
                return Err(MapError::StreamParameter(format!(
                    "'{}' is not a stream parameter of {}",
                    from, self.kind
                )));
            }
            if from != to && self.parameters().any(|name| name == to) {
                return Err(MapError::StreamParameter(format!(
                    "cannot rename '{}' to '{}': stream {} has a parameter of the same name",
                    from, to, self.kind
                )));
            }
            rename.insert(from, to);
        }

        let renamed = Self {
            rename,
            ..self.clone()
        };

        {
            let mut published = HashSet::new();
            for (name, _) in &renamed.parameters {
                let target = renamed.published_name(name);
                if !published.insert(target) {
                    return Err(MapError::StreamParameter(format!(
                        "stream {} would publish '{}' twice",
                        self.kind, target
                    )));
                }
            }
        }

        Ok(renamed)
    }

    // == Batch Trigger ==
    /// Merges the contents of `streams` in order.
    ///
    /// A later stream's value wins when two publish the same name.
    pub fn merged(streams: &[&Stream]) -> Contents {
        let mut contents = Contents::new();
        for stream in streams {
            contents.extend(stream.contents());
        }
        contents
    }

    /// Notifies every distinct subscriber of `streams` once with their merged contents.
    pub fn trigger(streams: &[&Stream]) {
        let contents = Self::merged(streams);

        let mut subscribers: Vec<&Subscriber> = Vec::new();
        for subscriber in streams.iter().flat_map(|stream| &stream.subscribers) {
            if !subscribers.iter().any(|seen| Arc::ptr_eq(seen, subscriber)) {
                subscribers.push(subscriber);
            }
        }

        debug!(
            "Batch trigger over {} streams reaching {} subscribers",
            streams.len(),
            subscribers.len()
        );
        for subscriber in subscribers {
            subscriber(&contents);
        }
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("kind", &self.kind)
            .field("contents", &self.contents())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
