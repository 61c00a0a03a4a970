//! Context id to descriptor lookup.

use std::collections::HashMap;

use super::RecordDescriptor;

/// Explicit registry of generated record types.
///
/// Generated modules expose a `registry()` function that registers every
/// descriptor they declare. Iteration follows registration order.
#[derive(Debug, Clone, Default)]
pub struct RecordRegistry {
    index: HashMap<&'static str, usize>,
    descriptors: Vec<&'static RecordDescriptor>,
}

impl RecordRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `descriptor`, returning the one it replaced, if any.
    pub fn register(
        &mut self,
        descriptor: &'static RecordDescriptor,
    ) -> Option<&'static RecordDescriptor> {
        match self.index.get(descriptor.context_id) {
            Some(&slot) => Some(std::mem::replace(&mut self.descriptors[slot], descriptor)),
            None => {
                self.index
                    .insert(descriptor.context_id, self.descriptors.len());
                self.descriptors.push(descriptor);
                None
            }
        }
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, descriptor: &'static RecordDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Looks up a descriptor by context id.
    pub fn get(&self, context_id: &str) -> Option<&'static RecordDescriptor> {
        self.index
            .get(context_id)
            .map(|&slot| self.descriptors[slot])
    }

    /// Looks up a descriptor by URI alias.
    pub fn by_alias(&self, alias: &str) -> Option<&'static RecordDescriptor> {
        self.descriptors.iter().copied().find(|d| d.alias == alias)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static RecordDescriptor> + '_ {
        self.descriptors.iter().copied()
    }
}
